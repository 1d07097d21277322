//! PostgreSQL integration tests for the booking repository.
//!
//! These tests share a single PostgreSQL container and truncate the table
//! between tests, so they are serialized.

use std::sync::Arc;

use booking_store::{BookingRepository, PostgresBookingRepository, StoreError};
use chrono::{Duration, Utc};
use common::{RequestId, RoomId};
use domain::{Booking, UserId};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/001_create_bookings_table.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_repository() -> PostgresBookingRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE bookings")
        .execute(&pool)
        .await
        .unwrap();

    PostgresBookingRepository::new(pool)
}

fn make_booking(user_id: UserId, room_id: RoomId) -> Booking {
    let now = Utc::now();
    Booking::pending(
        user_id,
        room_id,
        now + Duration::days(1),
        now + Duration::days(3),
        RequestId::new(),
        now,
    )
}

#[tokio::test]
#[serial]
async fn save_and_load_roundtrip() {
    let repo = get_test_repository().await;
    let booking = make_booking(UserId::new(), RoomId::new());

    repo.save(&booking).await.unwrap();

    let loaded = repo.find_by_id(booking.id()).await.unwrap().unwrap();
    assert_eq!(loaded.id(), booking.id());
    assert_eq!(loaded.user_id(), booking.user_id());
    assert_eq!(loaded.room_id(), booking.room_id());
    assert_eq!(loaded.state(), booking.state());
    assert_eq!(loaded.request_id(), booking.request_id());
}

#[tokio::test]
#[serial]
async fn save_twice_updates_status() {
    let repo = get_test_repository().await;
    let mut booking = make_booking(UserId::new(), RoomId::new());

    repo.save(&booking).await.unwrap();
    booking.confirm().unwrap();
    repo.save(&booking).await.unwrap();

    let loaded = repo.find_by_id(booking.id()).await.unwrap().unwrap();
    assert_eq!(loaded.state(), domain::BookingState::Confirmed);
}

#[tokio::test]
#[serial]
async fn request_id_unique_index_enforced() {
    let repo = get_test_repository().await;
    let booking = make_booking(UserId::new(), RoomId::new());
    repo.save(&booking).await.unwrap();

    let clashing = Booking::pending(
        UserId::new(),
        RoomId::new(),
        booking.start_date(),
        booking.end_date(),
        booking.request_id(),
        booking.created_at(),
    );

    let err = repo.save(&clashing).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateRequestId(_)));
}

#[tokio::test]
#[serial]
async fn find_for_user_orders_newest_first() {
    let repo = get_test_repository().await;
    let user_id = UserId::new();
    let base = Utc::now();

    let older = Booking::pending(
        user_id,
        RoomId::new(),
        base + Duration::days(1),
        base + Duration::days(2),
        RequestId::new(),
        base - Duration::hours(2),
    );
    let newer = Booking::pending(
        user_id,
        RoomId::new(),
        base + Duration::days(1),
        base + Duration::days(2),
        RequestId::new(),
        base,
    );
    repo.save(&older).await.unwrap();
    repo.save(&newer).await.unwrap();
    repo.save(&make_booking(UserId::new(), RoomId::new()))
        .await
        .unwrap();

    let bookings = repo.find_for_user(user_id).await.unwrap();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].id(), newer.id());
    assert_eq!(bookings[1].id(), older.id());
}

#[tokio::test]
#[serial]
async fn find_by_id_for_user_rejects_other_owner() {
    let repo = get_test_repository().await;
    let booking = make_booking(UserId::new(), RoomId::new());
    repo.save(&booking).await.unwrap();

    assert!(
        repo.find_by_id_for_user(booking.id(), booking.user_id())
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        repo.find_by_id_for_user(booking.id(), UserId::new())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[serial]
async fn find_by_request_id_locates_booking() {
    let repo = get_test_repository().await;
    let booking = make_booking(UserId::new(), RoomId::new());
    repo.save(&booking).await.unwrap();

    let found = repo
        .find_by_request_id(booking.request_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), booking.id());
    assert!(
        repo.find_by_request_id(RequestId::new())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[serial]
async fn conflict_scan_matches_confirmed_overlaps_only() {
    let repo = get_test_repository().await;
    let room_id = RoomId::new();
    let now = Utc::now();

    let mut confirmed = Booking::pending(
        UserId::new(),
        room_id,
        now + Duration::days(1),
        now + Duration::days(5),
        RequestId::new(),
        now,
    );
    confirmed.confirm().unwrap();
    repo.save(&confirmed).await.unwrap();

    // Pending overlap is invisible to the pre-check.
    let pending = Booking::pending(
        UserId::new(),
        room_id,
        now + Duration::days(2),
        now + Duration::days(6),
        RequestId::new(),
        now,
    );
    repo.save(&pending).await.unwrap();

    let conflicts = repo
        .find_confirmed_conflicts(room_id, now + Duration::days(4), now + Duration::days(8))
        .await
        .unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].id(), confirmed.id());

    // Touching endpoints still conflict (closed interval).
    let touching = repo
        .find_confirmed_conflicts(room_id, now + Duration::days(5), now + Duration::days(9))
        .await
        .unwrap();
    assert_eq!(touching.len(), 1);

    let disjoint = repo
        .find_confirmed_conflicts(room_id, now + Duration::days(20), now + Duration::days(22))
        .await
        .unwrap();
    assert!(disjoint.is_empty());
}
