//! In-process availability client backed by the authoritative ledger.

use std::sync::Arc;

use async_trait::async_trait;
use common::{RequestId, RoomId};
use domain::{AvailabilityRequest, Room};
use ledger::{AvailabilityLedger, LedgerStore};

use crate::error::SagaError;
use crate::services::availability::AvailabilityService;

/// Adapter that satisfies the orchestrator's availability port by calling
/// the ledger directly.
///
/// Ledger failures surface as transient availability errors, which puts
/// them inside the retry envelope exactly like a remote transport failure
/// would be.
pub struct LedgerAvailabilityService<S: LedgerStore> {
    ledger: Arc<AvailabilityLedger<S>>,
}

impl<S: LedgerStore> LedgerAvailabilityService<S> {
    /// Creates a new adapter over the given ledger.
    pub fn new(ledger: Arc<AvailabilityLedger<S>>) -> Self {
        Self { ledger }
    }
}

impl<S: LedgerStore> Clone for LedgerAvailabilityService<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

#[async_trait]
impl<S: LedgerStore> AvailabilityService for LedgerAvailabilityService<S> {
    async fn confirm_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<bool, SagaError> {
        self.ledger
            .confirm(request)
            .await
            .map_err(|e| SagaError::Availability(e.to_string()))
    }

    async fn release(&self, _room_id: RoomId, request_id: RequestId) -> Result<(), SagaError> {
        self.ledger
            .release(request_id)
            .await
            .map_err(|e| SagaError::Availability(e.to_string()))
    }

    async fn recommended_rooms(&self) -> Result<Vec<Room>, SagaError> {
        self.ledger
            .recommend_rooms()
            .await
            .map_err(|e| SagaError::Availability(e.to_string()))
    }
}
