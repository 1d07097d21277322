//! Domain layer for the room-booking system.
//!
//! This crate provides the core domain model:
//! - Booking record with its status state machine
//! - Validated booking request and room-choice resolution
//! - Room reference data and the availability-request payload
//! - Pure conflict/selection policy shared by the advisory local pre-check
//!   and the authoritative ledger check

pub mod booking;
pub mod error;
pub mod policy;
pub mod request;
pub mod room;
pub mod state;
pub mod value_objects;

pub use booking::Booking;
pub use error::DomainError;
pub use request::{AvailabilityRequest, BookingRequest, RoomChoice};
pub use room::Room;
pub use state::BookingState;
pub use value_objects::{BookingId, HotelId, UserId};
