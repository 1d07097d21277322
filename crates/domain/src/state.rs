//! Booking status state machine.

use serde::{Deserialize, Serialize};

/// The status of a booking in its lifecycle.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Confirmed ──► Cancelled
///           └──► Cancelled
/// ```
///
/// A booking is created `Pending`, resolved exactly once by the saga to
/// `Confirmed` or `Cancelled`, and a confirmed booking may later be
/// cancelled by its owner. There is no transition out of `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    /// Created locally, remote confirmation not yet resolved.
    #[default]
    Pending,

    /// The ledger accepted the block for this booking.
    Confirmed,

    /// Refused, failed, or cancelled by the owner (terminal state).
    Cancelled,
}

impl BookingState {
    /// Returns true if the saga may resolve this booking to `Confirmed`.
    pub fn can_confirm(&self) -> bool {
        matches!(self, BookingState::Pending)
    }

    /// Returns true if the booking can move to `Cancelled`.
    pub fn can_cancel(&self) -> bool {
        matches!(self, BookingState::Pending | BookingState::Confirmed)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingState::Cancelled)
    }

    /// Returns the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::Pending => "PENDING",
            BookingState::Confirmed => "CONFIRMED",
            BookingState::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from its database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BookingState::Pending),
            "CONFIRMED" => Some(BookingState::Confirmed),
            "CANCELLED" => Some(BookingState::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_pending() {
        assert_eq!(BookingState::default(), BookingState::Pending);
    }

    #[test]
    fn test_only_pending_can_confirm() {
        assert!(BookingState::Pending.can_confirm());
        assert!(!BookingState::Confirmed.can_confirm());
        assert!(!BookingState::Cancelled.can_confirm());
    }

    #[test]
    fn test_can_cancel_from_pending_and_confirmed() {
        assert!(BookingState::Pending.can_cancel());
        assert!(BookingState::Confirmed.can_cancel());
        assert!(!BookingState::Cancelled.can_cancel());
    }

    #[test]
    fn test_cancelled_is_the_only_terminal_state() {
        assert!(!BookingState::Pending.is_terminal());
        assert!(!BookingState::Confirmed.is_terminal());
        assert!(BookingState::Cancelled.is_terminal());
    }

    #[test]
    fn test_display_matches_storage_form() {
        assert_eq!(BookingState::Pending.to_string(), "PENDING");
        assert_eq!(BookingState::Confirmed.to_string(), "CONFIRMED");
        assert_eq!(BookingState::Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn test_parse_roundtrip() {
        for state in [
            BookingState::Pending,
            BookingState::Confirmed,
            BookingState::Cancelled,
        ] {
            assert_eq!(BookingState::parse(state.as_str()), Some(state));
        }
        assert_eq!(BookingState::parse("UNKNOWN"), None);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&BookingState::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");
        let deserialized: BookingState = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, BookingState::Confirmed);
    }
}
