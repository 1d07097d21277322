//! Booking coordinator driving the reservation saga.

use booking_store::BookingRepository;
use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use domain::{
    AvailabilityRequest, Booking, BookingId, BookingRequest, BookingState, RoomChoice, UserId,
};

use crate::error::SagaError;
use crate::retry::{RetryPolicy, Sleep, TokioSleep};
use crate::services::availability::AvailabilityService;

/// Orchestrates booking creation and cancellation across the local store
/// and the remote availability ledger.
///
/// The saga persists a PENDING booking before any remote call, drives the
/// retried confirmation, and reconciles the local status to CONFIRMED or
/// CANCELLED. Once the PENDING row exists the create call always resolves
/// to a terminal booking; only validation and lookup failures reject the
/// request outright.
pub struct BookingCoordinator<R, A, S = TokioSleep>
where
    R: BookingRepository,
    A: AvailabilityService,
    S: Sleep,
{
    repository: R,
    availability: A,
    retry: RetryPolicy,
    sleep: S,
}

impl<R, A> BookingCoordinator<R, A>
where
    R: BookingRepository,
    A: AvailabilityService,
{
    /// Creates a coordinator with the environment-configured retry policy
    /// and the tokio timer.
    pub fn new(repository: R, availability: A) -> Self {
        Self {
            repository,
            availability,
            retry: RetryPolicy::from_env(),
            sleep: TokioSleep,
        }
    }
}

impl<R, A, S> BookingCoordinator<R, A, S>
where
    R: BookingRepository,
    A: AvailabilityService,
    S: Sleep,
{
    /// Creates a coordinator with an explicit retry policy and sleeper.
    pub fn with_retry(repository: R, availability: A, retry: RetryPolicy, sleep: S) -> Self {
        Self {
            repository,
            availability,
            retry,
            sleep,
        }
    }

    /// Runs the booking-creation saga.
    ///
    /// Validation and room selection happen before anything is persisted;
    /// from the PENDING persist on, every outcome of the confirmation call
    /// maps to a terminal status and the booking is returned rather than
    /// an error.
    #[tracing::instrument(skip(self, request), fields(user_id = %user_id))]
    pub async fn create_booking(
        &self,
        user_id: UserId,
        request: BookingRequest,
    ) -> Result<Booking, SagaError> {
        metrics::counter!("booking_sagas_total").increment(1);
        let saga_start = std::time::Instant::now();

        let now = Utc::now();
        let room_id = match request.validate(now)? {
            RoomChoice::Explicit(room_id) => room_id,
            RoomChoice::Auto => {
                self.select_room(request.start_date, request.end_date)
                    .await?
            }
        };

        let request_id = RequestId::new();
        let mut booking = Booking::pending(
            user_id,
            room_id,
            request.start_date,
            request.end_date,
            request_id,
            now,
        );

        // Durable before any remote call: a crash from here on leaves a
        // recoverable PENDING row carrying the idempotency key.
        self.repository.save(&booking).await?;
        tracing::info!(booking_id = %booking.id(), %room_id, "booking created with status PENDING");

        let availability_request = AvailabilityRequest {
            room_id,
            start_date: request.start_date,
            end_date: request.end_date,
            booking_id: booking.id().to_string(),
            request_id,
        };

        let availability = &self.availability;
        let outcome = self
            .retry
            .execute(&self.sleep, || {
                let request = availability_request.clone();
                async move { availability.confirm_availability(&request).await }
            })
            .await;

        match outcome {
            Ok(true) => match self.finalize_confirmed(&mut booking).await {
                Ok(()) => {
                    metrics::counter!("bookings_confirmed").increment(1);
                    tracing::info!(booking_id = %booking.id(), "booking confirmed");
                }
                Err(e) => {
                    // The ledger may be holding a block we can no longer
                    // account for locally; compensate.
                    tracing::error!(booking_id = %booking.id(), error = %e, "failed to finalize confirmed booking");
                    self.cancel_with_release(&mut booking).await;
                }
            },
            Ok(false) => {
                // Explicit refusal: the ledger wrote nothing, so there is
                // nothing to release.
                booking.cancel();
                self.persist_terminal(&booking).await;
                metrics::counter!("bookings_cancelled").increment(1);
                tracing::warn!(booking_id = %booking.id(), "booking cancelled, room unavailable");
            }
            Err(SagaError::RetryExhausted {
                attempts,
                last_error,
            }) => {
                // Every attempt failed before an acknowledgement, so no
                // release is issued. A failure on the response path after
                // the ledger accepted would leave an orphaned block here;
                // see DESIGN.md.
                booking.cancel();
                self.persist_terminal(&booking).await;
                metrics::counter!("bookings_cancelled").increment(1);
                tracing::warn!(
                    booking_id = %booking.id(),
                    attempts,
                    error = %last_error,
                    "booking cancelled after retry exhaustion"
                );
            }
            Err(e) => {
                tracing::error!(booking_id = %booking.id(), error = %e, "unexpected failure while confirming booking");
                self.cancel_with_release(&mut booking).await;
            }
        }

        metrics::histogram!("booking_saga_duration_seconds")
            .record(saga_start.elapsed().as_secs_f64());
        Ok(booking)
    }

    /// Cancels a booking on behalf of its owner.
    ///
    /// A confirmed booking gets a best-effort release first; cancelling an
    /// already-cancelled booking is a no-op.
    #[tracing::instrument(skip(self), fields(booking_id = %booking_id, user_id = %user_id))]
    pub async fn cancel_booking(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> Result<Booking, SagaError> {
        let mut booking = self
            .repository
            .find_by_id_for_user(booking_id, user_id)
            .await?
            .ok_or(SagaError::BookingNotFound(booking_id))?;

        if booking.state() == BookingState::Confirmed
            && let Err(e) = self
                .availability
                .release(booking.room_id(), booking.request_id())
                .await
        {
            // Accepted leak: the block stays on the resource side until
            // someone reconciles it by the request id.
            tracing::error!(error = %e, "failed to release block during cancellation");
        }

        booking.cancel();
        self.repository.save(&booking).await?;
        metrics::counter!("bookings_cancelled").increment(1);
        tracing::info!("booking cancelled by user");
        Ok(booking)
    }

    /// Retrieves a booking scoped to its owner.
    pub async fn get_booking(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> Result<Booking, SagaError> {
        self.repository
            .find_by_id_for_user(booking_id, user_id)
            .await?
            .ok_or(SagaError::BookingNotFound(booking_id))
    }

    /// Lists a user's bookings, newest first.
    pub async fn list_bookings(&self, user_id: UserId) -> Result<Vec<Booking>, SagaError> {
        Ok(self.repository.find_for_user(user_id).await?)
    }

    /// Picks the first recommended room without a locally known conflict.
    ///
    /// The pre-check runs against confirmed local bookings only and is
    /// advisory; the ledger still has the final word at confirmation time.
    /// Any failure along the way degrades to "no room found", matching the
    /// contract that auto-selection either yields a candidate or rejects
    /// the request before persistence.
    async fn select_room(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<RoomId, SagaError> {
        let candidates = match self.availability.recommended_rooms().await {
            Ok(rooms) => rooms,
            Err(e) => {
                tracing::error!(error = %e, "room recommendation lookup failed");
                return Err(SagaError::NoAvailableRoom);
            }
        };

        for room in candidates {
            let conflicts = match self
                .repository
                .find_confirmed_conflicts(room.id, start_date, end_date)
                .await
            {
                Ok(conflicts) => conflicts,
                Err(e) => {
                    tracing::error!(error = %e, room_id = %room.id, "conflict pre-check failed");
                    return Err(SagaError::NoAvailableRoom);
                }
            };

            if conflicts.is_empty() {
                tracing::info!(room_id = %room.id, "auto-selected room");
                return Ok(room.id);
            }
        }

        Err(SagaError::NoAvailableRoom)
    }

    async fn finalize_confirmed(&self, booking: &mut Booking) -> Result<(), SagaError> {
        booking.confirm()?;
        self.repository.save(booking).await?;
        Ok(())
    }

    /// Cancels, persists, and issues a best-effort release.
    ///
    /// Release failure is logged and swallowed: an accepted resource leak,
    /// reconcilable later by the request id.
    async fn cancel_with_release(&self, booking: &mut Booking) {
        booking.cancel();
        self.persist_terminal(booking).await;
        metrics::counter!("bookings_cancelled").increment(1);

        if let Err(e) = self
            .availability
            .release(booking.room_id(), booking.request_id())
            .await
        {
            tracing::error!(
                booking_id = %booking.id(),
                error = %e,
                "failed to release block for cancelled booking"
            );
        }
    }

    /// Persists a terminal status, logging instead of failing the saga.
    async fn persist_terminal(&self, booking: &Booking) {
        if let Err(e) = self.repository.save(booking).await {
            tracing::error!(
                booking_id = %booking.id(),
                error = %e,
                "failed to persist terminal booking status"
            );
        }
    }
}
