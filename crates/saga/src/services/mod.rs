//! Collaborator ports consumed by the booking orchestrator.

pub mod availability;
pub mod ledger_client;

pub use availability::{AvailabilityService, InMemoryAvailabilityService};
pub use ledger_client::LedgerAvailabilityService;
