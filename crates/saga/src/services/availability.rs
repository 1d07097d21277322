//! Availability service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{RequestId, RoomId};
use domain::{AvailabilityRequest, Room};

use crate::error::SagaError;

/// Trait for the resource side's availability operations.
///
/// The orchestrator only ever talks to the ledger through this port; the
/// shapes match the remote interface, so an HTTP client and the in-process
/// adapter are interchangeable behind it.
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    /// Asks the resource owner to confirm a block for the request.
    ///
    /// `Ok(true)` means accepted (or replayed), `Ok(false)` is an explicit
    /// refusal, and `Err` is a transient failure eligible for retry.
    async fn confirm_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<bool, SagaError>;

    /// Releases a previously accepted block.
    ///
    /// The room id travels with the call for interface parity, but release
    /// is resolved purely by the request id.
    async fn release(&self, room_id: RoomId, request_id: RequestId) -> Result<(), SagaError>;

    /// Returns the advisory room ranking for auto-selection.
    async fn recommended_rooms(&self) -> Result<Vec<Room>, SagaError>;
}

#[derive(Debug, Default)]
struct InMemoryAvailabilityState {
    blocks: HashMap<RequestId, AvailabilityRequest>,
    rooms: Vec<Room>,
    refuse_confirm: bool,
    confirm_failures_remaining: u32,
    fail_on_release: bool,
    fail_on_recommend: bool,
    confirm_calls: u32,
    release_calls: u32,
}

/// In-memory availability service for testing.
///
/// Accepts everything by default; refusals and transient outages are
/// scripted per test. Honors idempotency the way the real ledger does: a
/// replayed request id is accepted without a second block.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAvailabilityService {
    state: Arc<RwLock<InMemoryAvailabilityState>>,
}

impl InMemoryAvailabilityService {
    /// Creates a new in-memory availability service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the recommendation list, in the order it will be returned.
    pub fn set_rooms(&self, rooms: Vec<Room>) {
        self.state.write().unwrap().rooms = rooms;
    }

    /// Configures confirm calls to refuse (return false).
    pub fn set_refuse_confirm(&self, refuse: bool) {
        self.state.write().unwrap().refuse_confirm = refuse;
    }

    /// Makes the next `count` confirm calls fail with a transient error.
    pub fn fail_confirm_times(&self, count: u32) {
        self.state.write().unwrap().confirm_failures_remaining = count;
    }

    /// Configures release calls to fail.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.state.write().unwrap().fail_on_release = fail;
    }

    /// Configures recommendation calls to fail.
    pub fn set_fail_on_recommend(&self, fail: bool) {
        self.state.write().unwrap().fail_on_recommend = fail;
    }

    /// Returns how many confirm calls were made.
    pub fn confirm_calls(&self) -> u32 {
        self.state.read().unwrap().confirm_calls
    }

    /// Returns how many release calls were made.
    pub fn release_calls(&self) -> u32 {
        self.state.read().unwrap().release_calls
    }

    /// Returns the number of live blocks.
    pub fn block_count(&self) -> usize {
        self.state.read().unwrap().blocks.len()
    }

    /// Returns true if a block is held for the given request id.
    pub fn has_block(&self, request_id: RequestId) -> bool {
        self.state.read().unwrap().blocks.contains_key(&request_id)
    }
}

#[async_trait]
impl AvailabilityService for InMemoryAvailabilityService {
    async fn confirm_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<bool, SagaError> {
        let mut state = self.state.write().unwrap();
        state.confirm_calls += 1;

        if state.confirm_failures_remaining > 0 {
            state.confirm_failures_remaining -= 1;
            return Err(SagaError::Availability("simulated outage".to_string()));
        }

        if state.blocks.contains_key(&request.request_id) {
            return Ok(true);
        }

        if state.refuse_confirm {
            return Ok(false);
        }

        state.blocks.insert(request.request_id, request.clone());
        Ok(true)
    }

    async fn release(&self, _room_id: RoomId, request_id: RequestId) -> Result<(), SagaError> {
        let mut state = self.state.write().unwrap();
        state.release_calls += 1;

        if state.fail_on_release {
            return Err(SagaError::Availability(
                "simulated release outage".to_string(),
            ));
        }

        state.blocks.remove(&request_id);
        Ok(())
    }

    async fn recommended_rooms(&self) -> Result<Vec<Room>, SagaError> {
        let state = self.state.read().unwrap();
        if state.fail_on_recommend {
            return Err(SagaError::Availability(
                "simulated recommendation outage".to_string(),
            ));
        }
        Ok(state.rooms.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use domain::HotelId;

    use super::*;

    fn request(room_id: RoomId) -> AvailabilityRequest {
        AvailabilityRequest {
            room_id,
            start_date: Utc::now() + Duration::days(1),
            end_date: Utc::now() + Duration::days(3),
            booking_id: "booking".to_string(),
            request_id: RequestId::new(),
        }
    }

    #[tokio::test]
    async fn test_confirm_and_release() {
        let service = InMemoryAvailabilityService::new();
        let req = request(RoomId::new());

        assert!(service.confirm_availability(&req).await.unwrap());
        assert_eq!(service.block_count(), 1);
        assert!(service.has_block(req.request_id));

        service.release(req.room_id, req.request_id).await.unwrap();
        assert_eq!(service.block_count(), 0);
        assert_eq!(service.confirm_calls(), 1);
        assert_eq!(service.release_calls(), 1);
    }

    #[tokio::test]
    async fn test_replayed_request_id_keeps_one_block() {
        let service = InMemoryAvailabilityService::new();
        let req = request(RoomId::new());

        assert!(service.confirm_availability(&req).await.unwrap());
        assert!(service.confirm_availability(&req).await.unwrap());
        assert_eq!(service.block_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_refusal() {
        let service = InMemoryAvailabilityService::new();
        service.set_refuse_confirm(true);

        let accepted = service.confirm_availability(&request(RoomId::new())).await.unwrap();
        assert!(!accepted);
        assert_eq!(service.block_count(), 0);
    }

    #[tokio::test]
    async fn test_scripted_transient_failures_then_acceptance() {
        let service = InMemoryAvailabilityService::new();
        service.fail_confirm_times(2);
        let req = request(RoomId::new());

        assert!(service.confirm_availability(&req).await.is_err());
        assert!(service.confirm_availability(&req).await.is_err());
        assert!(service.confirm_availability(&req).await.unwrap());
        assert_eq!(service.confirm_calls(), 3);
    }

    #[tokio::test]
    async fn test_recommended_rooms_returns_configured_list() {
        let service = InMemoryAvailabilityService::new();
        let rooms = vec![Room::new(HotelId::new(), "1"), Room::new(HotelId::new(), "2")];
        service.set_rooms(rooms.clone());

        assert_eq!(service.recommended_rooms().await.unwrap(), rooms);
    }
}
