use std::path::PathBuf;

use chrono::TimeDelta;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Search endpoint of the remote catalog, without query parameters.
    pub catalog_url: String,
    /// Number of listings requested in the single catalog call.
    pub catalog_page_size: u32,
    pub cache_ttl_secs: u64,
    /// Directory holding the durable catalog cache record.
    pub cache_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// Cache time-to-live as a [`TimeDelta`], saturating on absurd values.
    #[must_use]
    pub fn cache_ttl(&self) -> TimeDelta {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }
}
