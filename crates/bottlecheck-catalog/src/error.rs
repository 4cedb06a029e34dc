use thiserror::Error;

/// Failure to obtain the remote catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog response for {context} is not a JSON array of listings")]
    UnexpectedShape { context: String },

    #[error("invalid catalog URL \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Failure reading or writing the durable cache record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
