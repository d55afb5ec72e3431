use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response envelope carried an error status.
    #[error("upstream error from {endpoint}: code {code}")]
    Upstream { endpoint: String, code: String },

    /// HTTP 429. `retry_after_secs` is 0 when no usable `Retry-After` was sent.
    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("invalid value for header {name}: \"{value}\"")]
    InvalidHeader { name: &'static str, value: String },

    #[error("pagination limit reached for category {category_id}: {total_pages} pages exceeds {max_pages}")]
    PaginationLimit {
        category_id: String,
        total_pages: u32,
        max_pages: u32,
    },

    #[error("city \"{city}\" not found in the cities list")]
    CityNotFound { city: String },

    #[error("city \"{city}\" has no short code")]
    CityWithoutCode { city: String },

    #[error("no store address contains \"{address}\"")]
    StoreNotFound { address: String },

    #[error("category \"{name}\" not found")]
    CategoryNotFound { name: String },

    #[error("failed to write raw dump {path}: {source}")]
    Dump {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
