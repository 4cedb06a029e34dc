pub mod app_config;
pub mod catalog;
pub mod comparison;
pub mod config;
pub mod error;
pub mod observed;

pub use app_config::AppConfig;
pub use catalog::{CatalogEntry, CatalogSnapshot};
pub use comparison::{CatalogMatch, ComparisonReport, MatchResult};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use observed::{parse_price, ObservedProduct};
