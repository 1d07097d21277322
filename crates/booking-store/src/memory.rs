use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use domain::{Booking, BookingId, BookingState, UserId, policy};
use tokio::sync::RwLock;

use crate::store::BookingRepository;
use crate::{Result, StoreError};

/// In-memory booking repository for testing.
///
/// Provides the same interface and constraint behavior as the PostgreSQL
/// implementation, including the unique index on `request_id`.
#[derive(Clone, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored bookings.
    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.len()
    }

    /// Clears all bookings.
    pub async fn clear(&self) {
        self.bookings.write().await.clear();
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<()> {
        let mut bookings = self.bookings.write().await;

        // Unique index simulation: no two bookings may share a request id.
        let duplicate = bookings
            .values()
            .any(|b| b.request_id() == booking.request_id() && b.id() != booking.id());
        if duplicate {
            return Err(StoreError::DuplicateRequestId(booking.request_id()));
        }

        bookings.insert(booking.id(), booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn find_by_id_for_user(
        &self,
        id: BookingId,
        user_id: UserId,
    ) -> Result<Option<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .get(&id)
            .filter(|b| b.user_id() == user_id)
            .cloned())
    }

    async fn find_for_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut result: Vec<_> = bookings
            .values()
            .filter(|b| b.user_id() == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn find_by_request_id(&self, request_id: RequestId) -> Result<Option<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| b.request_id() == request_id)
            .cloned())
    }

    async fn find_confirmed_conflicts(
        &self,
        room_id: RoomId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| {
                b.room_id() == room_id
                    && b.state() == BookingState::Confirmed
                    && policy::overlaps(b.start_date(), b.end_date(), start_date, end_date)
            })
            .cloned()
            .collect())
    }
}
