use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Connection Failure: {0}")]
    ConnectionFailure(String),
    #[error("Malformed Response: {0}")]
    MalformedResponse(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Status: HTTP {status} from {url}")]
    BadStatus { status: u16, url: String },
    #[error("Unexpected Error: {0}")]
    Unexpected(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl RecoveryError {
    /// Failures a source provider is expected to absorb as "no result".
    pub fn is_stage_miss(&self) -> bool {
        matches!(
            self,
            RecoveryError::Timeout(_)
                | RecoveryError::ConnectionFailure(_)
                | RecoveryError::MalformedResponse(_)
                | RecoveryError::NotFound(_)
                | RecoveryError::BadStatus { .. }
        )
    }
}

impl From<reqwest::Error> for RecoveryError {
    fn from(err: reqwest::Error) -> Self {
        let msg = err.to_string();
        if err.is_timeout() {
            RecoveryError::Timeout(msg)
        } else if err.is_connect() || err.is_request() {
            RecoveryError::ConnectionFailure(msg)
        } else if err.is_decode() || err.is_body() {
            RecoveryError::MalformedResponse(msg)
        } else if let Some(status) = err.status() {
            RecoveryError::BadStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            RecoveryError::Unexpected(msg)
        }
    }
}

pub type Result<T> = std::result::Result<T, RecoveryError>;
