//! Availability block: one accepted reservation interval for a room.

use chrono::{DateTime, Utc};
use common::{RequestId, RoomId};
use domain::AvailabilityRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an availability block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Creates a new random block ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a block ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry in the availability ledger.
///
/// Created by an accepted confirm call, deleted by a release keyed on the
/// request id. The booking reference is an opaque correlation string owned
/// by the requesting side; the ledger never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    pub id: BlockId,
    pub room_id: RoomId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub blocked: bool,
    pub booking_ref: String,
    pub request_id: RequestId,
}

impl AvailabilityBlock {
    /// Builds the blocked entry for an accepted confirmation request.
    pub fn for_request(request: &AvailabilityRequest) -> Self {
        Self {
            id: BlockId::new(),
            room_id: request.room_id,
            start_date: request.start_date,
            end_date: request.end_date,
            blocked: true,
            booking_ref: request.booking_id.clone(),
            request_id: request.request_id,
        }
    }
}
