//! Command handlers: wire the scraper stages together for one run.
//!
//! Stages run strictly in sequence: category selection, store resolution,
//! id collection, detail fetches, export. Any stage error ends the run
//! before the output file is touched.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;

use winestock_core::{AppConfig, ProductErrorPolicy, ProductId, ProductRecord, RunProfile};
use winestock_scraper::{
    resolve_store, select_categories, to_record, CollectionSummary, Pacing, RawDumper,
    RecordContext, ScraperError, SimpleWineClient,
};

use crate::export::write_records_to_path;

/// What a finished `collect` run produced.
#[derive(Debug)]
pub(crate) struct RunReport {
    pub categories: usize,
    pub collected: CollectionSummary,
    pub exported: usize,
    /// Ids whose detail request failed under [`ProductErrorPolicy::Skip`].
    pub skipped: Vec<ProductId>,
    pub output_path: PathBuf,
}

/// Builds the API client from process config and the run profile.
pub(crate) fn build_client(
    config: &AppConfig,
    profile: &RunProfile,
) -> Result<SimpleWineClient, ScraperError> {
    let dumper = if profile.dump_raw_responses {
        RawDumper::to_dir(config.dump_dir.clone())
    } else {
        RawDumper::disabled()
    };

    Ok(SimpleWineClient::new(
        &config.base_url,
        &profile.api_version,
        config.request_timeout_secs,
    )?
    .with_device(profile.device.clone())
    .with_pacing(Pacing::from_millis(
        config.inter_request_delay_ms,
        config.pacing_jitter_ms,
    ))
    .with_retries(config.max_retries, config.retry_backoff_base_secs)
    .with_dumper(dumper))
}

/// Runs the full scrape for the profile's target store and writes the rows
/// to `output_path`.
///
/// # Errors
///
/// Returns an error if no target address is configured, the store or
/// category cannot be resolved, any listing page fails, a detail request
/// fails under [`ProductErrorPolicy::Abort`], or the export fails (including
/// when there is nothing to export).
pub(crate) async fn run_collect(
    client: &SimpleWineClient,
    profile: &RunProfile,
    output_path: &Path,
) -> anyhow::Result<RunReport> {
    let target = profile.store_target()?;

    let categories = client
        .fetch_categories()
        .await
        .context("failed to fetch categories")?;
    if profile.category.is_none() {
        tracing::info!(
            categories = categories.len(),
            "no category filter configured; walking every category"
        );
    }
    let categories = select_categories(
        categories,
        profile.category.as_deref(),
        profile.missing_category,
    )?;

    let resolved = resolve_store(client, &target)
        .await
        .with_context(|| format!("failed to resolve store for \"{}\"", target.address))?;
    let filter = resolved.listing_filter();

    let started = Instant::now();
    let collected = client
        .collect_product_ids(&categories, &filter, profile.available_only)
        .await
        .context("failed to collect product ids")?;
    tracing::info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        unique = collected.summary.unique,
        "id collection finished"
    );

    let ctx = RecordContext::new(&resolved, &target);
    let started = Instant::now();
    let (records, skipped) = fetch_records(
        client,
        collected.ids.iter().copied(),
        &ctx,
        &filter.city_code,
        profile.on_product_error,
    )
    .await?;
    tracing::info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        records = records.len(),
        skipped = skipped.len(),
        "detail fetch finished"
    );

    write_records_to_path(output_path, &records)
        .with_context(|| format!("failed to export to {}", output_path.display()))?;
    tracing::info!(path = %output_path.display(), rows = records.len(), "export written");

    Ok(RunReport {
        categories: categories.len(),
        collected: collected.summary,
        exported: records.len(),
        skipped,
        output_path: output_path.to_path_buf(),
    })
}

/// Fetches and flattens each product in order. The capture timestamp is
/// taken as soon as each response has parsed.
async fn fetch_records(
    client: &SimpleWineClient,
    ids: impl Iterator<Item = ProductId>,
    ctx: &RecordContext,
    city_code: &str,
    policy: ProductErrorPolicy,
) -> anyhow::Result<(Vec<ProductRecord>, Vec<ProductId>)> {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for id in ids {
        match client.fetch_product(id, city_code).await {
            Ok(detail) => {
                let captured_at = Utc::now();
                records.push(to_record(detail, ctx, captured_at, client.site_origin()));
            }
            Err(e) => match policy {
                ProductErrorPolicy::Abort => {
                    return Err(e).with_context(|| format!("failed to fetch product {id}"));
                }
                ProductErrorPolicy::Skip => {
                    tracing::warn!(product_id = id, error = %e, "skipping product");
                    skipped.push(id);
                }
            },
        }
    }

    Ok((records, skipped))
}

/// Prints every store with its resolved region.
pub(crate) async fn run_stores(client: &SimpleWineClient) -> anyhow::Result<()> {
    let cities = client.fetch_cities().await.context("failed to fetch cities")?;
    let stores = client
        .fetch_stores(&cities)
        .await
        .context("failed to fetch stores")?;

    for store in &stores {
        println!(
            "{}\t{}\t{}\t{}",
            store.id,
            store.region.as_deref().unwrap_or("-"),
            store.name,
            store.address
        );
    }
    tracing::info!(stores = stores.len(), "stores listed");
    Ok(())
}

pub(crate) async fn run_categories(client: &SimpleWineClient) -> anyhow::Result<()> {
    let categories = client
        .fetch_categories()
        .await
        .context("failed to fetch categories")?;

    for category in &categories {
        println!("{}\t{}", category.category_id, category.name);
    }
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
