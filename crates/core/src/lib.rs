pub mod catalog;
pub mod config;

pub use catalog::{
    Spot, SpotCatalog, SpotError, SpotFields, SpotPatch, SqliteSpotCatalog, WriteOutcome,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, DatabaseConfig, ServerConfig, StaticSiteConfig,
};
