//! Run profile: what a single scrape run targets.
//!
//! Loaded from YAML (`config/profile.yaml` by default) and then overridden
//! by CLI flags. Validation is a separate step so overrides can be applied
//! first.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// What to do when a configured category name matches nothing upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingCategoryPolicy {
    /// Report `CategoryNotFound` and stop the run.
    #[default]
    Fail,
    /// Treat the run as having no categories to walk.
    Empty,
}

/// What to do when a single product detail request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductErrorPolicy {
    /// Abandon the run; nothing is written.
    #[default]
    Abort,
    /// Log the failing id and keep going with the rest.
    Skip,
}

/// Identifiers the upstream API expects from its Android client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub device_code: String,
    pub device: String,
    pub protocol: String,
    pub version: String,
    pub mindbox_uid: String,
    pub user_agent: String,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            device_code: "yPIuMiKrIXkNm0eqFrO8Mg".to_string(),
            device: "Android".to_string(),
            protocol: "30".to_string(),
            version: "161".to_string(),
            mindbox_uid: "593d56cd-64da-427e-9614-c7937ecf8163".to_string(),
            user_agent: "okhttp/3.14.7".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunProfile {
    /// Version segment for the stores, cities and categories endpoints.
    /// Listing and product endpoints are always `v3`.
    pub api_version: String,
    /// Carried through for reference; no endpoint consumes it.
    pub shop_id: Option<String>,
    pub available_only: bool,
    /// `"City, street ..."`; the whole string must be a substring of the
    /// upstream store address.
    pub address: Option<String>,
    pub category: Option<String>,
    pub dump_raw_responses: bool,
    pub missing_category: MissingCategoryPolicy,
    pub on_product_error: ProductErrorPolicy,
    pub device: DeviceProfile,
}

impl Default for RunProfile {
    fn default() -> Self {
        Self {
            api_version: "v2".to_string(),
            shop_id: None,
            available_only: true,
            address: None,
            category: None,
            dump_raw_responses: false,
            missing_category: MissingCategoryPolicy::default(),
            on_product_error: ProductErrorPolicy::default(),
            device: DeviceProfile::default(),
        }
    }
}

impl RunProfile {
    /// Checks the fields every command needs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an empty API version or a
    /// blank category name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api_version must be non-empty".to_string(),
            ));
        }
        if self
            .category
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "category must be omitted or non-empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the parsed target store, or an error when none is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `address` is absent or has no
    /// city part.
    pub fn store_target(&self) -> Result<StoreTarget, ConfigError> {
        let address = self.address.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "no target store address configured; set `address` in the run profile or pass --address"
                    .to_string(),
            )
        })?;
        StoreTarget::parse(address)
    }
}

/// The store a run is scoped to, split into its city and street parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTarget {
    /// Full configured address, matched as a substring of store addresses.
    pub address: String,
    /// First word before the first comma.
    pub city: String,
    /// Everything after the first comma, trimmed.
    pub street: String,
}

impl StoreTarget {
    /// Splits `"Обнинск, пр-кт. Ленина, дом 137"` into city `Обнинск` and
    /// street `пр-кт. Ленина, дом 137`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the address is blank or the
    /// city part is empty.
    pub fn parse(address: &str) -> Result<Self, ConfigError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ConfigError::Validation(
                "target store address must be non-empty".to_string(),
            ));
        }

        let street = address.split_once(',').map_or("", |(_, tail)| tail);
        let city = city_from_address(address).ok_or_else(|| {
            ConfigError::Validation(format!(
                "target store address \"{address}\" has no city before the first comma"
            ))
        })?;

        Ok(Self {
            address: address.to_string(),
            city: city.to_string(),
            street: street.trim().to_string(),
        })
    }
}

/// City part of a `"City, street ..."` address: the first word before the
/// first comma.
#[must_use]
pub fn city_from_address(address: &str) -> Option<&str> {
    let head = address.split_once(',').map_or(address, |(head, _)| head);
    head.split_whitespace().next()
}

/// Load a run profile from a YAML file. Does not validate.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_profile(path: &Path) -> Result<RunProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let profile: RunProfile = serde_yaml::from_str(&content)?;
    Ok(profile)
}
