use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = or_default("WINESTOCK_BASE_URL", "https://simplewine.ru");
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "WINESTOCK_BASE_URL".to_string(),
            reason: format!("\"{base_url}\" is not an http(s) URL"),
        });
    }

    let log_level = or_default("WINESTOCK_LOG_LEVEL", "info");
    let profile_path = PathBuf::from(or_default(
        "WINESTOCK_PROFILE_PATH",
        "./config/profile.yaml",
    ));
    let output_path = PathBuf::from(or_default("WINESTOCK_OUTPUT_PATH", "data.csv"));
    let dump_dir = PathBuf::from(or_default("WINESTOCK_DUMP_DIR", "saved_data"));

    let request_timeout_secs = parse_u64("WINESTOCK_REQUEST_TIMEOUT_SECS", "30")?;
    let inter_request_delay_ms = parse_u64("WINESTOCK_INTER_REQUEST_DELAY_MS", "330")?;
    let pacing_jitter_ms = parse_u64("WINESTOCK_PACING_JITTER_MS", "0")?;
    let max_retries = parse_u32("WINESTOCK_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("WINESTOCK_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        base_url,
        log_level,
        profile_path,
        output_path,
        dump_dir,
        request_timeout_secs,
        inter_request_delay_ms,
        pacing_jitter_ms,
        max_retries,
        retry_backoff_base_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
