use thiserror::Error;

/// Application-wide error types for lapline.
#[derive(Error, Debug)]
pub enum AppError {
    /// The API answered `429 Too Many Requests`.
    #[error("Rate limit exceeded for {url}")]
    RateLimited { url: String },

    /// The API answered with a non-success status other than 429.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// HTTP request could not be built or its body could not be read.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A retryable error kept occurring until the retry policy gave up.
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<AppError> },

    /// The API response did not have the expected shape.
    #[error("Transform error: {0}")]
    TransformError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Returns true if this error is transient and worth retrying.
    ///
    /// Only rate-limit responses qualify. Every other failure, including
    /// other 4xx/5xx statuses, is terminal for the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::RateLimited { .. })
    }
}
