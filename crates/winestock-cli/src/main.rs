mod export;
mod pipeline;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use winestock_core::{ProductErrorPolicy, RunProfile};

#[derive(Debug, Parser)]
#[command(name = "winestock")]
#[command(about = "Collects the product assortment of one SimpleWine store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect every product stocked by the target store and export it
    Collect(CollectArgs),
    /// List all stores with their region
    Stores,
    /// List all catalog categories
    Categories,
}

#[derive(Debug, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
struct CollectArgs {
    /// Target store address, e.g. "Обнинск, пр-кт. Ленина, дом 137"
    #[arg(long)]
    address: Option<String>,

    /// Restrict collection to the category with exactly this name
    #[arg(long, conflicts_with = "all_categories")]
    category: Option<String>,

    /// Ignore any category configured in the run profile
    #[arg(long)]
    all_categories: bool,

    /// Collect products that are currently out of stock as well
    #[arg(long)]
    include_unavailable: bool,

    /// Save raw stores, cities and categories responses
    #[arg(long)]
    dump: bool,

    /// Log and skip products whose detail request fails
    #[arg(long)]
    skip_failed_products: bool,

    /// Output file (overrides `WINESTOCK_OUTPUT_PATH`)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl CollectArgs {
    /// Applies the flags that were given on top of the loaded profile.
    fn apply_to(&self, profile: &mut RunProfile) {
        if let Some(address) = &self.address {
            profile.address = Some(address.clone());
        }
        if self.all_categories {
            profile.category = None;
        } else if let Some(category) = &self.category {
            profile.category = Some(category.clone());
        }
        if self.include_unavailable {
            profile.available_only = false;
        }
        if self.dump {
            profile.dump_raw_responses = true;
        }
        if self.skip_failed_products {
            profile.on_product_error = ProductErrorPolicy::Skip;
        }
    }
}

/// Loads the run profile, falling back to defaults when the file is absent.
fn load_run_profile(path: &Path) -> anyhow::Result<RunProfile> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "run profile not found; using defaults");
        return Ok(RunProfile::default());
    }
    winestock_core::load_profile(path)
        .with_context(|| format!("failed to load run profile {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = winestock_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut profile = load_run_profile(&config.profile_path)?;
    if let Commands::Collect(args) = &cli.command {
        args.apply_to(&mut profile);
    }
    profile.validate()?;

    let client = pipeline::build_client(&config, &profile)
        .context("failed to build SimpleWine client")?;

    match cli.command {
        Commands::Collect(args) => {
            let output = args.output.unwrap_or_else(|| config.output_path.clone());
            let report = pipeline::run_collect(&client, &profile, &output).await?;
            println!(
                "exported {} products from {} categories to {} ({} duplicates dropped, {} skipped)",
                report.exported,
                report.categories,
                report.output_path.display(),
                report.collected.duplicates,
                report.skipped.len()
            );
        }
        Commands::Stores => pipeline::run_stores(&client).await?,
        Commands::Categories => pipeline::run_categories(&client).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
