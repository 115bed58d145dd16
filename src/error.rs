use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoreError {
    #[error("API error: {code}, {message}")]
    Api { code: String, message: String },

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type MoreResult<T> = Result<T, MoreError>;
