//! Room reference data owned by the resource side.

use common::RoomId;
use serde::{Deserialize, Serialize};

use crate::value_objects::HotelId;

/// A room as exposed by the resource side.
///
/// Read-mostly reference data. `times_booked` is an advisory popularity
/// counter used only to rank recommendation candidates; it carries no
/// correctness guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,

    /// Hotel this room belongs to.
    pub hotel_id: HotelId,

    /// Human-facing room number.
    pub number: String,

    /// Whether the room is offered for booking at all.
    pub available: bool,

    /// How many times this room has been successfully booked.
    pub times_booked: i64,
}

impl Room {
    /// Creates a new available room with a zeroed booking counter.
    pub fn new(hotel_id: HotelId, number: impl Into<String>) -> Self {
        Self {
            id: RoomId::new(),
            hotel_id,
            number: number.into(),
            available: true,
            times_booked: 0,
        }
    }

    /// Bumps the advisory booking counter.
    pub fn record_booking(&mut self) {
        self.times_booked += 1;
    }
}
