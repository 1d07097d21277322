use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use domain::Room;

use crate::Result;
use crate::block::AvailabilityBlock;

/// Storage interface for the availability ledger.
///
/// Holds both the block log and the room catalog. All implementations must
/// be thread-safe (Send + Sync). The ledger serializes check-then-insert
/// per room above this trait; implementations additionally carry whatever
/// storage-level constraints they can (unique request id, block exclusion).
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Retrieves the block created for the given idempotency key.
    async fn find_block_by_request_id(
        &self,
        request_id: RequestId,
    ) -> Result<Option<AvailabilityBlock>>;

    /// Retrieves blocked entries for the room whose interval overlaps the
    /// given closed interval.
    async fn find_conflicting_blocks(
        &self,
        room_id: RoomId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityBlock>>;

    /// Inserts a new block.
    async fn insert_block(&self, block: &AvailabilityBlock) -> Result<()>;

    /// Deletes the block with the given idempotency key.
    ///
    /// Returns true if an entry was removed, false if none existed.
    async fn delete_block_by_request_id(&self, request_id: RequestId) -> Result<bool>;

    /// Retrieves a room from the catalog.
    async fn find_room(&self, room_id: RoomId) -> Result<Option<Room>>;

    /// Inserts the room, or updates it if the id already exists.
    async fn save_room(&self, room: &Room) -> Result<()>;

    /// Retrieves rooms offered for booking, least-booked first, ties broken
    /// by ascending id.
    async fn list_available_rooms(&self) -> Result<Vec<Room>>;
}
