use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use domain::{HotelId, Room};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::block::{AvailabilityBlock, BlockId};
use crate::store::LedgerStore;
use crate::{LedgerError, Result};

/// PostgreSQL-backed ledger store.
///
/// Carries the storage-level variants of the ledger's constraints: a unique
/// index on the block request id and a gist exclusion constraint forbidding
/// overlapping blocked intervals per room.
#[derive(Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    /// Creates a new PostgreSQL ledger store.
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

    fn row_to_block(row: PgRow) -> Result<AvailabilityBlock> {
        Ok(AvailabilityBlock {
            id: BlockId::from_uuid(row.try_get::<Uuid, _>("id")?),
            room_id: RoomId::from_uuid(row.try_get::<Uuid, _>("room_id")?),
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            blocked: row.try_get("blocked")?,
            booking_ref: row.try_get("booking_ref")?,
            request_id: RequestId::from_uuid(row.try_get::<Uuid, _>("request_id")?),
        })
    }

    fn row_to_room(row: PgRow) -> Result<Room> {
        Ok(Room {
            id: RoomId::from_uuid(row.try_get::<Uuid, _>("id")?),
            hotel_id: HotelId::from_uuid(row.try_get::<Uuid, _>("hotel_id")?),
            number: row.try_get("number")?,
            available: row.try_get("available")?,
            times_booked: row.try_get("times_booked")?,
        })
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn find_block_by_request_id(
        &self,
        request_id: RequestId,
    ) -> Result<Option<AvailabilityBlock>> {
        let row = sqlx::query(
            r#"
            SELECT id, room_id, start_date, end_date, blocked, booking_ref, request_id
            FROM room_availability
            WHERE request_id = $1
            "#,
        )
        .bind(request_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_block).transpose()
    }

    async fn find_conflicting_blocks(
        &self,
        room_id: RoomId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityBlock>> {
        let rows = sqlx::query(
            r#"
            SELECT id, room_id, start_date, end_date, blocked, booking_ref, request_id
            FROM room_availability
            WHERE room_id = $1
              AND blocked = TRUE
              AND start_date <= $3
              AND end_date >= $2
            "#,
        )
        .bind(room_id.as_uuid())
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_block).collect()
    }

    async fn insert_block(&self, block: &AvailabilityBlock) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO room_availability (id, room_id, start_date, end_date, blocked, booking_ref, request_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(block.id.as_uuid())
        .bind(block.room_id.as_uuid())
        .bind(block.start_date)
        .bind(block.end_date)
        .bind(block.blocked)
        .bind(&block.booking_ref)
        .bind(block.request_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                match db_err.constraint() {
                    Some("no_overlapping_blocks") => {
                        return LedgerError::BlockOverlap(block.room_id);
                    }
                    Some("unique_block_request_id") => {
                        return LedgerError::DuplicateRequestId(block.request_id);
                    }
                    _ => {}
                }
            }
            LedgerError::Database(e)
        })?;

        Ok(())
    }

    async fn delete_block_by_request_id(&self, request_id: RequestId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM room_availability WHERE request_id = $1")
            .bind(request_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_room(&self, room_id: RoomId) -> Result<Option<Room>> {
        let row = sqlx::query(
            r#"
            SELECT id, hotel_id, number, available, times_booked
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(room_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_room).transpose()
    }

    async fn save_room(&self, room: &Room) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rooms (id, hotel_id, number, available, times_booked)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
                SET number = EXCLUDED.number,
                    available = EXCLUDED.available,
                    times_booked = EXCLUDED.times_booked
            "#,
        )
        .bind(room.id.as_uuid())
        .bind(room.hotel_id.as_uuid())
        .bind(&room.number)
        .bind(room.available)
        .bind(room.times_booked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_available_rooms(&self) -> Result<Vec<Room>> {
        let rows = sqlx::query(
            r#"
            SELECT id, hotel_id, number, available, times_booked
            FROM rooms
            WHERE available = TRUE
            ORDER BY times_booked ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_room).collect()
    }
}
