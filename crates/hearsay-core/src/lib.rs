use thiserror::Error;

pub mod app_config;
pub mod brands;
pub mod config;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use brands::{
    load_brands, BrandConfig, BrandsFile, ChannelConfig, KeywordConfig, NotificationsConfig,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{Channel, ItemType, Platform, SentimentLabel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read brands file {path}: {source}")]
    BrandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brands file: {0}")]
    BrandsFileParse(#[from] serde_yaml::Error),

    #[error("brands file validation failed: {0}")]
    Validation(String),
}
