//! Store Error Types

use thiserror::Error;

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the document store layer
///
/// None of these are shown to HTTP clients; handlers log them and answer
/// with a generic failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB driver reported a failure
    #[error("driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// The store location could not be turned into a connection URL
    #[error("invalid store address '{0}'")]
    InvalidAddress(String),

    /// An update tried to change a field the store never rewrites
    #[error("performing an update on the path '{0}' would modify an immutable field")]
    ImmutableField(String),

    /// An insert reused an existing storage identifier
    #[error("duplicate key: _id {0}")]
    DuplicateKey(String),

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_detail() {
        let err = StoreError::ImmutableField("_id".to_string());
        assert!(err.to_string().contains("'_id'"));

        let err = StoreError::backend("socket closed");
        assert_eq!(err.to_string(), "backend error: socket closed");
    }
}
