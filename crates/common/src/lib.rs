//! Identifier types shared between the booking side and the resource side.

pub mod types;

pub use types::{RequestId, RoomId};
