use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use domain::{Booking, BookingId, UserId};

use crate::Result;

/// Storage interface for bookings.
///
/// All implementations must be thread-safe (Send + Sync). Saving enforces
/// the unique index on `request_id`; bookings are never deleted.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking, or updates it if the id already exists.
    async fn save(&self, booking: &Booking) -> Result<()>;

    /// Retrieves a booking by id.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Retrieves a booking by id, scoped to its owning user.
    ///
    /// Returns None when the booking exists but belongs to someone else.
    async fn find_by_id_for_user(
        &self,
        id: BookingId,
        user_id: UserId,
    ) -> Result<Option<Booking>>;

    /// Retrieves all bookings for a user, newest first.
    async fn find_for_user(&self, user_id: UserId) -> Result<Vec<Booking>>;

    /// Retrieves the booking created with the given idempotency key.
    async fn find_by_request_id(&self, request_id: RequestId) -> Result<Option<Booking>>;

    /// Retrieves confirmed bookings for the room whose stay overlaps the
    /// given closed interval.
    ///
    /// This feeds the advisory local pre-check during auto-selection; only
    /// CONFIRMED rows count, pending and cancelled ones do not.
    async fn find_confirmed_conflicts(
        &self,
        room_id: RoomId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<Booking>>;
}
