//! Booking persistence for the requesting side.
//!
//! Exposes the [`BookingRepository`] trait with two implementations:
//! - [`InMemoryBookingRepository`] for tests and local development
//! - [`PostgresBookingRepository`] backed by sqlx
//!
//! The repository owns the unique index on the booking's request id; the
//! saga relies on it to keep the record format recoverable after a crash
//! between the PENDING persist and the remote confirmation.

pub mod config;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use config::DatabaseConfig;
pub use error::{Result, StoreError};
pub use memory::InMemoryBookingRepository;
pub use postgres::PostgresBookingRepository;
pub use store::BookingRepository;
