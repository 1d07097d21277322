//! Booking request validation and boundary payload shapes.

use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// An inbound request to create a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Explicitly requested room, if any.
    pub room_id: Option<RoomId>,

    /// When set, the orchestrator picks a room from the recommendation
    /// ranking instead of using `room_id`.
    #[serde(default)]
    pub auto_select: bool,

    /// Requested stay start.
    pub start_date: DateTime<Utc>,

    /// Requested stay end.
    pub end_date: DateTime<Utc>,
}

/// How the room for a booking is to be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomChoice {
    /// Use the caller-supplied room.
    Explicit(RoomId),

    /// Pick the first conflict-free room from the recommendation ranking.
    Auto,
}

impl BookingRequest {
    /// Creates a request for an explicit room.
    pub fn for_room(room_id: RoomId, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            room_id: Some(room_id),
            auto_select: false,
            start_date,
            end_date,
        }
    }

    /// Creates an auto-selecting request.
    pub fn auto(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            room_id: None,
            auto_select: true,
            start_date,
            end_date,
        }
    }

    /// Validates the request against `now` and resolves the room choice.
    ///
    /// Both dates must lie strictly in the future and the end must come
    /// after the start. Auto-selection takes precedence over a supplied
    /// room id.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<RoomChoice, DomainError> {
        if self.start_date <= now {
            return Err(DomainError::DateNotInFuture {
                field: "start date",
            });
        }
        if self.end_date <= now {
            return Err(DomainError::DateNotInFuture { field: "end date" });
        }
        if self.end_date <= self.start_date {
            return Err(DomainError::EndNotAfterStart);
        }

        if self.auto_select {
            Ok(RoomChoice::Auto)
        } else {
            self.room_id
                .map(RoomChoice::Explicit)
                .ok_or(DomainError::RoomChoiceMissing)
        }
    }
}

/// Payload sent to the resource side to confirm (and later release) a block.
///
/// The booking id travels as an opaque string correlation id; the ledger
/// never resolves it, it only stores it alongside the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub room_id: RoomId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub booking_id: String,
    pub request_id: RequestId,
}
