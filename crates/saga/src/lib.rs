//! Booking orchestration saga.
//!
//! Coordinates a room reservation across two autonomous stores: the local
//! booking record and the resource side's availability ledger. The saga
//! persists a PENDING booking, drives a bounded-retry confirmation call
//! against the ledger, reconciles the outcome to CONFIRMED or CANCELLED,
//! and issues best-effort compensation (release) when a failure leaves the
//! remote side possibly holding a block.
//!
//! There is no distributed transaction; idempotency keys and compensation
//! are what keep the two stores convergent.

pub mod coordinator;
pub mod error;
pub mod retry;
pub mod services;

pub use coordinator::BookingCoordinator;
pub use error::SagaError;
pub use retry::{RetryPolicy, Sleep, TokioSleep};
pub use services::{AvailabilityService, InMemoryAvailabilityService, LedgerAvailabilityService};
