use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use domain::{Booking, BookingId, BookingState, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::store::BookingRepository;
use crate::{Result, StoreError};

/// PostgreSQL-backed booking repository.
#[derive(Clone)]
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    /// Creates a new PostgreSQL booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_booking(row: PgRow) -> Result<Booking> {
        let status: String = row.try_get("status")?;
        let state =
            BookingState::parse(&status).ok_or_else(|| StoreError::InvalidState(status))?;

        Ok(Booking::from_parts(
            BookingId::from_uuid(row.try_get::<Uuid, _>("id")?),
            UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            RoomId::from_uuid(row.try_get::<Uuid, _>("room_id")?),
            row.try_get("start_date")?,
            row.try_get("end_date")?,
            state,
            RequestId::from_uuid(row.try_get::<Uuid, _>("request_id")?),
            row.try_get("created_at")?,
        ))
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, room_id, start_date, end_date, status, request_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET status = EXCLUDED.status
            "#,
        )
        .bind(booking.id().as_uuid())
        .bind(booking.user_id().as_uuid())
        .bind(booking.room_id().as_uuid())
        .bind(booking.start_date())
        .bind(booking.end_date())
        .bind(booking.state().as_str())
        .bind(booking.request_id().as_uuid())
        .bind(booking.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("unique_booking_request_id")
            {
                return StoreError::DuplicateRequestId(booking.request_id());
            }
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, room_id, start_date, end_date, status, request_id, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn find_by_id_for_user(
        &self,
        id: BookingId,
        user_id: UserId,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, room_id, start_date, end_date, status, request_id, created_at
            FROM bookings
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn find_for_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, room_id, start_date, end_date, status, request_id, created_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_booking).collect()
    }

    async fn find_by_request_id(&self, request_id: RequestId) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, room_id, start_date, end_date, status, request_id, created_at
            FROM bookings
            WHERE request_id = $1
            "#,
        )
        .bind(request_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn find_confirmed_conflicts(
        &self,
        room_id: RoomId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, room_id, start_date, end_date, status, request_id, created_at
            FROM bookings
            WHERE room_id = $1
              AND status = 'CONFIRMED'
              AND start_date <= $3
              AND end_date >= $2
            "#,
        )
        .bind(room_id.as_uuid())
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_booking).collect()
    }
}
