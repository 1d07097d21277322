use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use domain::{Room, policy};
use tokio::sync::RwLock;

use crate::block::{AvailabilityBlock, BlockId};
use crate::store::LedgerStore;
use crate::{LedgerError, Result};

#[derive(Debug, Default)]
struct LedgerState {
    blocks: HashMap<BlockId, AvailabilityBlock>,
    rooms: HashMap<RoomId, Room>,
}

/// In-memory ledger store for testing.
///
/// Mirrors the PostgreSQL implementation's constraints: a duplicate request
/// id and an overlapping blocked interval are both rejected at insert.
#[derive(Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates a new empty in-memory ledger store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored blocks.
    pub async fn block_count(&self) -> usize {
        self.state.read().await.blocks.len()
    }

    /// Returns all stored blocks, unordered.
    pub async fn blocks(&self) -> Vec<AvailabilityBlock> {
        self.state.read().await.blocks.values().cloned().collect()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn find_block_by_request_id(
        &self,
        request_id: RequestId,
    ) -> Result<Option<AvailabilityBlock>> {
        Ok(self
            .state
            .read()
            .await
            .blocks
            .values()
            .find(|b| b.request_id == request_id)
            .cloned())
    }

    async fn find_conflicting_blocks(
        &self,
        room_id: RoomId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityBlock>> {
        Ok(self
            .state
            .read()
            .await
            .blocks
            .values()
            .filter(|b| {
                b.room_id == room_id
                    && b.blocked
                    && policy::overlaps(b.start_date, b.end_date, start_date, end_date)
            })
            .cloned()
            .collect())
    }

    async fn insert_block(&self, block: &AvailabilityBlock) -> Result<()> {
        let mut state = self.state.write().await;

        // Constraint simulation: unique request id, no blocked overlap.
        if state
            .blocks
            .values()
            .any(|b| b.request_id == block.request_id)
        {
            return Err(LedgerError::DuplicateRequestId(block.request_id));
        }
        if block.blocked
            && state.blocks.values().any(|b| {
                b.room_id == block.room_id
                    && b.blocked
                    && policy::overlaps(b.start_date, b.end_date, block.start_date, block.end_date)
            })
        {
            return Err(LedgerError::BlockOverlap(block.room_id));
        }

        state.blocks.insert(block.id, block.clone());
        Ok(())
    }

    async fn delete_block_by_request_id(&self, request_id: RequestId) -> Result<bool> {
        let mut state = self.state.write().await;
        let id = state
            .blocks
            .values()
            .find(|b| b.request_id == request_id)
            .map(|b| b.id);

        Ok(match id {
            Some(id) => state.blocks.remove(&id).is_some(),
            None => false,
        })
    }

    async fn find_room(&self, room_id: RoomId) -> Result<Option<Room>> {
        Ok(self.state.read().await.rooms.get(&room_id).cloned())
    }

    async fn save_room(&self, room: &Room) -> Result<()> {
        self.state.write().await.rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn list_available_rooms(&self) -> Result<Vec<Room>> {
        let state = self.state.read().await;
        let mut rooms: Vec<_> = state
            .rooms
            .values()
            .filter(|r| r.available)
            .cloned()
            .collect();
        policy::rank_rooms(&mut rooms);
        Ok(rooms)
    }
}
