use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid observed product \"{name}\": {reason}")]
    InvalidProduct { name: String, reason: String },

    #[error("could not read a price from \"{0}\"")]
    InvalidPrice(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
