//! Booking record and lifecycle.

use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::state::BookingState;
use crate::value_objects::{BookingId, UserId};

/// A booking held by the requesting side.
///
/// Created `Pending` before any remote call is made, then resolved by the
/// saga to `Confirmed` or `Cancelled`. The `request_id` is minted once at
/// creation and never changes; while the booking is confirmed it correlates
/// with at most one live availability block on the resource side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    user_id: UserId,
    room_id: RoomId,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    state: BookingState,
    request_id: RequestId,
    created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new pending booking with a fresh id.
    pub fn pending(
        user_id: UserId,
        room_id: RoomId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        request_id: RequestId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BookingId::new(),
            user_id,
            room_id,
            start_date,
            end_date,
            state: BookingState::Pending,
            request_id,
            created_at,
        }
    }

    /// Reconstructs a booking from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: BookingId,
        user_id: UserId,
        room_id: RoomId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        state: BookingState,
        request_id: RequestId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            room_id,
            start_date,
            end_date,
            state,
            request_id,
            created_at,
        }
    }

    /// Marks the booking confirmed.
    ///
    /// Only a pending booking can be confirmed; the saga resolves each
    /// booking at most once.
    pub fn confirm(&mut self) -> Result<(), DomainError> {
        if !self.state.can_confirm() {
            return Err(DomainError::InvalidTransition {
                action: "confirm",
                state: self.state,
            });
        }
        self.state = BookingState::Confirmed;
        Ok(())
    }

    /// Marks the booking cancelled.
    ///
    /// Cancelling an already-cancelled booking is a no-op.
    pub fn cancel(&mut self) {
        if self.state.can_cancel() {
            self.state = BookingState::Cancelled;
        }
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    pub fn state(&self) -> BookingState {
        self.state
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
