//! Saga error types.

use booking_store::StoreError;
use domain::{BookingId, DomainError};
use thiserror::Error;

/// Errors that can occur during saga operations.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The booking request failed validation before anything was persisted.
    #[error("validation error: {0}")]
    Validation(#[from] DomainError),

    /// No booking with that id belongs to the requesting user.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Auto-selection exhausted the recommendation list without finding a
    /// conflict-free room.
    #[error("no available rooms found for the requested period")]
    NoAvailableRoom,

    /// The availability service call failed; retried by the executor.
    #[error("availability service error: {0}")]
    Availability(String),

    /// All confirmation attempts raised transient failures.
    #[error("remote call failed after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },

    /// Booking store error.
    #[error("booking store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
