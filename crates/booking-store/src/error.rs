use common::RequestId;
use thiserror::Error;

/// Errors that can occur when interacting with the booking store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another booking already holds this request id.
    #[error("duplicate request id: {0}")]
    DuplicateRequestId(RequestId),

    /// A stored status column did not parse back into a booking state.
    #[error("invalid booking state in storage: {0}")]
    InvalidState(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for booking store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
