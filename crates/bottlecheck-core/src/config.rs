use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_CATALOG_URL: &str = "https://services.baxus.co/api/search/listings";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("BOTTLECHECK_LOG_LEVEL", "info");

    let catalog_url = or_default("BOTTLECHECK_CATALOG_URL", DEFAULT_CATALOG_URL);
    if !catalog_url.starts_with("http://") && !catalog_url.starts_with("https://") {
        return Err(invalid(
            "BOTTLECHECK_CATALOG_URL",
            format!("\"{catalog_url}\" is not an http(s) URL"),
        ));
    }

    let catalog_page_size = parse_u32("BOTTLECHECK_CATALOG_PAGE_SIZE", "3000")?;
    if catalog_page_size == 0 {
        return Err(invalid(
            "BOTTLECHECK_CATALOG_PAGE_SIZE",
            "must be greater than zero".into(),
        ));
    }

    let cache_ttl_secs = parse_u64("BOTTLECHECK_CACHE_TTL_SECS", "600")?;
    if cache_ttl_secs == 0 {
        return Err(invalid(
            "BOTTLECHECK_CACHE_TTL_SECS",
            "must be greater than zero".into(),
        ));
    }

    let cache_dir = lookup("BOTTLECHECK_CACHE_DIR")
        .map_or_else(|_| default_cache_dir(), PathBuf::from);

    let request_timeout_secs = parse_u64("BOTTLECHECK_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "BOTTLECHECK_USER_AGENT",
        "bottlecheck/0.1 (price-comparison)",
    );

    Ok(AppConfig {
        log_level,
        catalog_url,
        catalog_page_size,
        cache_ttl_secs,
        cache_dir,
        request_timeout_secs,
        user_agent,
    })
}

/// Platform cache directory with a `bottlecheck` subdirectory, falling back
/// to a relative `.bottlecheck-cache` when the platform has none.
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir().map_or_else(
        || PathBuf::from(".bottlecheck-cache"),
        |dir| dir.join("bottlecheck"),
    )
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
