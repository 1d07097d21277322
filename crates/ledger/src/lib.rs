//! Authoritative availability ledger for the resource side.
//!
//! The ledger is the single owner of which rooms are blocked for which
//! intervals. It exposes three operations:
//! - `confirm`: idempotently accept or refuse a block for a room
//! - `release`: idempotently delete a block by its request id
//! - `recommend_rooms`: advisory least-booked-first room ranking
//!
//! The no-overlap invariant (no two blocked entries for one room may share
//! an instant) is enforced by an explicit per-room serialization region
//! around the check-then-insert sequence, with a storage-level exclusion
//! constraint as the PostgreSQL backstop.

pub mod block;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod postgres;
pub mod store;

pub use block::{AvailabilityBlock, BlockId};
pub use error::{LedgerError, Result};
pub use ledger::AvailabilityLedger;
pub use memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;
pub use store::LedgerStore;
