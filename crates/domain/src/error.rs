//! Domain error types.

use thiserror::Error;

use crate::state::BookingState;

/// Errors raised by domain validation and state transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The requested end date is not strictly after the start date.
    #[error("end date must be after start date")]
    EndNotAfterStart,

    /// A booking date lies in the past.
    #[error("{field} must be in the future")]
    DateNotInFuture { field: &'static str },

    /// Neither an explicit room nor auto-selection was requested.
    #[error("either a room id or auto-select is required")]
    RoomChoiceMissing,

    /// The booking is not in a state that permits the transition.
    #[error("cannot {action} a booking in state {state}")]
    InvalidTransition {
        action: &'static str,
        state: BookingState,
    },
}
