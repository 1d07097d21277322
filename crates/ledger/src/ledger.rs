//! The availability ledger: idempotent confirm, idempotent release, and the
//! advisory room recommendation.

use std::collections::HashMap;
use std::sync::Arc;

use common::{RequestId, RoomId};
use domain::{AvailabilityRequest, Room};
use tokio::sync::Mutex;

use crate::block::AvailabilityBlock;
use crate::store::LedgerStore;
use crate::{LedgerError, Result};

/// Authoritative keeper of room availability.
///
/// Generic over its storage so the same confirmation logic runs against the
/// in-memory store in tests and PostgreSQL in production. The check-then-act
/// sequence in [`confirm`](Self::confirm) runs inside a per-room mutex
/// region: two concurrent confirmations for the same room are serialized,
/// confirmations for different rooms proceed in parallel.
pub struct AvailabilityLedger<S: LedgerStore> {
    store: S,
    room_locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl<S: LedgerStore> AvailabilityLedger<S> {
    /// Creates a new ledger over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            room_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Gets a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn room_lock(&self, room_id: RoomId) -> Arc<Mutex<()>> {
        let mut locks = self.room_locks.lock().await;
        locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Confirms (or refuses) a block for a room.
    ///
    /// Replay-safe: a request id that was already accepted is answered with
    /// `true` without re-evaluating conflicts. A conflicting blocked
    /// interval yields `false` and writes nothing. Otherwise the block is
    /// inserted and the room's advisory booking counter is bumped.
    #[tracing::instrument(skip(self, request), fields(room_id = %request.room_id, request_id = %request.request_id))]
    pub async fn confirm(&self, request: &AvailabilityRequest) -> Result<bool> {
        metrics::counter!("ledger_confirmations_total").increment(1);

        let lock = self.room_lock(request.room_id).await;
        let _guard = lock.lock().await;

        if self
            .store
            .find_block_by_request_id(request.request_id)
            .await?
            .is_some()
        {
            tracing::info!("request already processed, replaying acceptance");
            return Ok(true);
        }

        let conflicts = self
            .store
            .find_conflicting_blocks(request.room_id, request.start_date, request.end_date)
            .await?;
        if !conflicts.is_empty() {
            metrics::counter!("ledger_refusals_total").increment(1);
            tracing::warn!(
                conflicts = conflicts.len(),
                "room already blocked for the requested period"
            );
            return Ok(false);
        }

        let mut room = self
            .store
            .find_room(request.room_id)
            .await?
            .ok_or(LedgerError::RoomNotFound(request.room_id))?;

        let block = AvailabilityBlock::for_request(request);
        match self.store.insert_block(&block).await {
            Ok(()) => {}
            // Constraint race with a writer outside this process: treat the
            // storage verdict as the refusal it is.
            Err(LedgerError::BlockOverlap(_)) => {
                metrics::counter!("ledger_refusals_total").increment(1);
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        room.record_booking();
        self.store.save_room(&room).await?;

        tracing::info!(block_id = %block.id, "availability confirmed");
        Ok(true)
    }

    /// Releases the block created for the given request id.
    ///
    /// Idempotent: absence is not an error. Addressed purely by the request
    /// id so a caller that lost the room id can still release.
    #[tracing::instrument(skip(self), fields(request_id = %request_id))]
    pub async fn release(&self, request_id: RequestId) -> Result<()> {
        let removed = self.store.delete_block_by_request_id(request_id).await?;
        if removed {
            metrics::counter!("ledger_releases_total").increment(1);
            tracing::info!("block released");
        } else {
            tracing::debug!("no block held for request id");
        }
        Ok(())
    }

    /// Returns bookable rooms ranked least-booked first.
    ///
    /// An advisory hint for auto-selection, not an allocation.
    pub async fn recommend_rooms(&self) -> Result<Vec<Room>> {
        self.store.list_available_rooms().await
    }
}
