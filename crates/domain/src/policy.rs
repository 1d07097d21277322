//! Conflict and selection policy.
//!
//! Pure functions shared by the booking side (advisory pre-check when
//! auto-selecting a room) and the resource side (authoritative check in the
//! availability ledger). Keeping both sides on one definition means a local
//! pre-check can only ever disagree with the ledger through staleness, never
//! through a different notion of "conflict".

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::room::Room;

/// Closed-interval overlap test for two date ranges.
///
/// Returns true when `[a_start, a_end]` and `[b_start, b_end]` share at
/// least one instant; touching endpoints count as a conflict.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Recommendation ordering: least-booked first, ties broken by ascending id.
///
/// Advisory only. The ranking spreads new bookings across rooms to reduce
/// confirmation contention; it is never consulted for correctness.
pub fn recommendation_order(a: &Room, b: &Room) -> Ordering {
    a.times_booked
        .cmp(&b.times_booked)
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts rooms into recommendation order.
pub fn rank_rooms(rooms: &mut [Room]) {
    rooms.sort_by(recommendation_order);
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use common::RoomId;
    use uuid::Uuid;

    use super::*;
    use crate::value_objects::HotelId;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, d, 12, 0, 0).unwrap()
    }

    fn room(id: u128, times_booked: i64) -> Room {
        Room {
            id: RoomId::from_uuid(Uuid::from_u128(id)),
            hotel_id: HotelId::new(),
            number: format!("{}", id),
            available: true,
            times_booked,
        }
    }

    #[test]
    fn test_disjoint_ranges_do_not_overlap() {
        assert!(!overlaps(day(1), day(3), day(5), day(8)));
        assert!(!overlaps(day(5), day(8), day(1), day(3)));
    }

    #[test]
    fn test_touching_endpoints_count_as_overlap() {
        // Closed intervals: a range ending exactly where another starts
        // still conflicts.
        assert!(overlaps(day(1), day(3), day(3), day(5)));
        assert!(overlaps(day(3), day(5), day(1), day(3)));
    }

    #[test]
    fn test_containment_overlaps() {
        assert!(overlaps(day(1), day(10), day(4), day(5)));
        assert!(overlaps(day(4), day(5), day(1), day(10)));
    }

    #[test]
    fn test_partial_overlap() {
        assert!(overlaps(day(1), day(5), day(4), day(8)));
        assert!(overlaps(day(4), day(8), day(1), day(5)));
    }

    #[test]
    fn test_identical_ranges_overlap() {
        assert!(overlaps(day(2), day(4), day(2), day(4)));
    }

    #[test]
    fn test_rank_rooms_by_times_booked_then_id() {
        let mut rooms = vec![room(3, 5), room(2, 0), room(1, 0), room(4, 2)];
        rank_rooms(&mut rooms);

        let ids: Vec<u128> = rooms.iter().map(|r| r.id.as_uuid().as_u128()).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_rank_rooms_is_deterministic_for_equal_counters() {
        let mut a = vec![room(2, 1), room(1, 1)];
        let mut b = vec![room(1, 1), room(2, 1)];
        rank_rooms(&mut a);
        rank_rooms(&mut b);
        assert_eq!(a, b);
    }
}
