/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for errors a form can surface inline and let the user retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::HttpClient(_) | AppError::Api { .. } | AppError::Auth(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
