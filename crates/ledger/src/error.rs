use common::RoomId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced room does not exist in the catalog.
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    /// Another block already holds this request id.
    #[error("duplicate request id: {0}")]
    DuplicateRequestId(common::RequestId),

    /// The storage layer rejected a block that overlaps an existing one.
    ///
    /// Reachable only when the storage constraint fires underneath the
    /// per-room lock (e.g. another process wrote to the same database);
    /// the ledger maps it to a refusal.
    #[error("overlapping block rejected by storage for room {0}")]
    BlockOverlap(RoomId),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
