use chrono::{Duration, TimeZone, Utc};
use common::RoomId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::policy::{overlaps, rank_rooms};
use domain::{BookingRequest, HotelId, Room};
use uuid::Uuid;

fn bench_overlap_check(c: &mut Criterion) {
    let base = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let intervals: Vec<_> = (0..256)
        .map(|i| {
            (
                base + Duration::days(i * 2),
                base + Duration::days(i * 2 + 3),
            )
        })
        .collect();
    let probe = (base + Duration::days(100), base + Duration::days(104));

    c.bench_function("domain/overlap_scan", |b| {
        b.iter(|| {
            intervals
                .iter()
                .filter(|(start, end)| overlaps(*start, *end, probe.0, probe.1))
                .count()
        });
    });
}

fn bench_rank_rooms(c: &mut Criterion) {
    let hotel_id = HotelId::new();
    let rooms: Vec<Room> = (0..512)
        .map(|i| Room {
            id: RoomId::from_uuid(Uuid::from_u128(i as u128)),
            hotel_id,
            number: format!("{}", i),
            available: true,
            times_booked: (i * 7 % 13) as i64,
        })
        .collect();

    c.bench_function("domain/rank_rooms", |b| {
        b.iter(|| {
            let mut candidates = rooms.clone();
            rank_rooms(&mut candidates);
            candidates
        });
    });
}

fn bench_validate_request(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let request = BookingRequest::for_room(
        RoomId::new(),
        now + Duration::days(1),
        now + Duration::days(4),
    );

    c.bench_function("domain/validate_request", |b| {
        b.iter(|| request.validate(now).unwrap());
    });
}

criterion_group!(
    benches,
    bench_overlap_check,
    bench_rank_rooms,
    bench_validate_request
);
criterion_main!(benches);
