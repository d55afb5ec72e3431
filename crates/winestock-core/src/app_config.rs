use std::path::PathBuf;

/// Process-level settings read from the environment.
///
/// Everything that describes *what* to scrape lives in
/// [`crate::RunProfile`]; this struct only carries transport, pacing and
/// output locations.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub log_level: String,
    pub profile_path: PathBuf,
    pub output_path: PathBuf,
    pub dump_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub inter_request_delay_ms: u64,
    pub pacing_jitter_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
