pub mod app_config;
pub mod config;
pub mod profile;
pub mod records;
pub mod slug;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use profile::{
    city_from_address, load_profile, DeviceProfile, MissingCategoryPolicy, ProductErrorPolicy,
    RunProfile, StoreTarget,
};
pub use records::{Category, City, ProductId, ProductRecord, Store};
pub use slug::slugify;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read run profile {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse run profile: {0}")]
    ProfileParse(#[from] serde_yaml::Error),

    #[error("invalid run profile: {0}")]
    Validation(String),
}
