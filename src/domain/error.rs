use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Generative error: {0}")]
    Generative(String),

    #[error("Response parse error: {0}")]
    ResponseParse(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("{service} unavailable: {message}")]
    Unavailable { service: String, message: String },

    #[error("Batch chunk {chunk} failed after {stored} records stored: {message}")]
    BatchChunkFailed {
        chunk: usize,
        stored: usize,
        message: String,
    },
}

impl DomainError {
    /// Transient upstream failures are the only errors worth retrying.
    /// Parse and validation failures never are.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::Timeout(_) | DomainError::Unavailable { .. }
        )
    }
}

impl From<String> for DomainError {
    fn from(s: String) -> Self {
        DomainError::Database(s)
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}
