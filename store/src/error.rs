use thiserror::Error;

/// Failure of the underlying key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}
