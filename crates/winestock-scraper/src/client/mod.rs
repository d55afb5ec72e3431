//! HTTP client for the simplewine.ru mobile API.

mod endpoints;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use winestock_core::DeviceProfile;

use crate::dump::RawDumper;
use crate::error::ScraperError;
use crate::pacing::Pacing;
use crate::retry::retry_with_backoff;
use crate::types::Envelope;

/// Listing and product endpoints only exist under this version, whatever
/// version the run profile uses for the catalog endpoints.
pub(crate) const LISTING_API_VERSION: &str = "v3";

/// Items requested per listing page.
pub const LISTING_PAGE_SIZE: u32 = 100;

/// Store and city scope for the listing and product endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    /// Slug of the store display name.
    pub store_slug: String,
    /// City short code, sent as `x-city-code`.
    pub city_code: String,
}

impl ListingFilter {
    #[must_use]
    pub fn new(store_slug: impl Into<String>, city_code: impl Into<String>) -> Self {
        Self {
            store_slug: store_slug.into(),
            city_code: city_code.into(),
        }
    }

    /// Value of the listing `filter` query parameter.
    #[must_use]
    pub fn filter_param(&self) -> String {
        format!("[store][0]{}", self.store_slug)
    }
}

/// Client for the simplewine.ru mobile API.
///
/// Every response is checked for an error-status envelope, which surfaces
/// as [`ScraperError::Upstream`]. Transport failures (network, 429, 5xx)
/// are retried with exponential backoff; envelope errors never are.
///
/// Listing and product requests carry the Android client headers from the
/// configured [`DeviceProfile`] and are followed by a pause from the
/// configured [`Pacing`].
pub struct SimpleWineClient {
    client: Client,
    base_url: Url,
    api_version: String,
    device: DeviceProfile,
    pacing: Pacing,
    dumper: RawDumper,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl SimpleWineClient {
    /// Creates a client for `base_url` (e.g. `https://simplewine.ru`) with
    /// default device headers, no pacing, no retries and dumps disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidBaseUrl`] if
    /// `base_url` does not parse as a base URL.
    pub fn new(base_url: &str, api_version: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Exactly one trailing slash so joined paths land under any prefix.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ScraperError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            api_version: api_version.to_owned(),
            device: DeviceProfile::default(),
            pacing: Pacing::None,
            dumper: RawDumper::disabled(),
            max_retries: 0,
            backoff_base_secs: 0,
        })
    }

    #[must_use]
    pub fn with_device(mut self, device: DeviceProfile) -> Self {
        self.device = device;
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub fn with_dumper(mut self, dumper: RawDumper) -> Self {
        self.dumper = dumper;
        self
    }

    /// `max_retries` extra attempts for transient failures, waiting
    /// `backoff_base_secs * 2^(n-1)` seconds before retry `n`.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_secs = backoff_base_secs;
        self
    }

    #[must_use]
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Scheme, host and any path prefix, without a trailing slash. Image
    /// paths in product payloads are relative to this.
    #[must_use]
    pub fn site_origin(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Builds `{base}/api/{segments...}`. An empty last segment yields a
    /// trailing slash.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Cannot fail: `new` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    /// Headers the Android app sends with listing and product requests.
    fn device_headers(&self, city_code: &str) -> Result<HeaderMap, ScraperError> {
        let pairs: [(&'static str, &str); 7] = [
            ("x-device-code", &self.device.device_code),
            ("x-city-code", city_code),
            ("x-develop-device", &self.device.device),
            ("x-develop-protocol", &self.device.protocol),
            ("x-develop-version", &self.device.version),
            ("x-mindbox-uid", &self.device.mindbox_uid),
            ("user-agent", &self.device.user_agent),
        ];

        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            let header_value =
                HeaderValue::from_str(value).map_err(|_| ScraperError::InvalidHeader {
                    name,
                    value: value.to_owned(),
                })?;
            headers.insert(HeaderName::from_static(name), header_value);
        }
        Ok(headers)
    }

    /// Sends a GET request with retry, parses the body as JSON and checks
    /// the status envelope.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Upstream`] if the envelope carries an error status,
    ///   whatever the HTTP status was.
    /// - [`ScraperError::RateLimited`] on HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ScraperError::Http`] on network failure after all retries.
    /// - [`ScraperError::Deserialize`] if a 2xx body is not JSON.
    async fn request_json(
        &self,
        endpoint: &str,
        url: Url,
        headers: Option<&HeaderMap>,
    ) -> Result<Value, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let headers = headers.cloned();
            async move {
                let mut request = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json");
                if let Some(headers) = headers {
                    request = request.headers(headers);
                }

                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(0);
                    return Err(ScraperError::RateLimited {
                        url: url.to_string(),
                        retry_after_secs,
                    });
                }

                let body = response.text().await?;

                if !status.is_success() {
                    // The API often pairs an error envelope with a 4xx status;
                    // the envelope code is the more useful report.
                    if let Ok(value) = serde_json::from_str::<Value>(&body) {
                        check_envelope(endpoint, &value)?;
                    }
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let value = serde_json::from_str::<Value>(&body).map_err(|e| {
                    ScraperError::Deserialize {
                        context: format!("{endpoint} response from {url}"),
                        source: e,
                    }
                })?;
                check_envelope(endpoint, &value)?;
                Ok(value)
            }
        })
        .await
    }
}

/// Returns [`ScraperError::Upstream`] when the envelope `status` contains
/// `error` (any case). The `code` field is reported as-is.
pub(crate) fn check_envelope(endpoint: &str, body: &Value) -> Result<(), ScraperError> {
    let is_error = body
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| s.to_ascii_lowercase().contains("error"));
    if !is_error {
        return Ok(());
    }

    let code = match body.get("code") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "unknown".to_owned(),
    };
    Err(ScraperError::Upstream {
        endpoint: endpoint.to_owned(),
        code,
    })
}

/// Deserializes the `data` payload of an already-checked envelope.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<T, ScraperError> {
    serde_json::from_value::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| ScraperError::Deserialize {
            context: format!("{endpoint} payload"),
            source: e,
        })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
