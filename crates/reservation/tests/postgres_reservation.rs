//! Reservation engine against PostgreSQL.
//!
//! Every test publishes its own train in one shared container, so tests can
//! run in parallel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use booking_store::{BookingLedger, InventoryStore, NewTrain, PostgresBookingStore, TrainId};
use chrono::Utc;
use common::UserId;
use reservation::{ReservationEngine, ReservationError};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

type Engine = ReservationEngine<PostgresBookingStore>;

struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();
static TRAIN_NUMBER: AtomicU32 = AtomicU32::new(1);

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();
            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let pool = sqlx::PgPool::connect(&connection_string).await.unwrap();
            PostgresBookingStore::new(pool.clone())
                .run_migrations()
                .await
                .unwrap();
            pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// An engine over a fresh pool, plus a newly published train.
async fn setup(seats: u32) -> (Arc<Engine>, TrainId) {
    let info = get_container_info().await;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(32)
        .connect(&info.connection_string)
        .await
        .unwrap();
    let store = PostgresBookingStore::new(pool);

    let departure = Utc::now();
    let number = TRAIN_NUMBER.fetch_add(1, Ordering::SeqCst);
    let train = store
        .create_train(NewTrain {
            train_number: format!("PG-{number}"),
            name: "Duronto".to_string(),
            source: "Sealdah".to_string(),
            destination: "New Delhi".to_string(),
            departure_time: departure,
            arrival_time: departure + chrono::Duration::hours(17),
            total_seats: seats,
        })
        .await
        .unwrap();

    let engine = ReservationEngine::new(store).with_lock_wait(Duration::from_secs(10));
    (Arc::new(engine), train.id)
}

/// available + booked == total, read from one snapshot.
async fn assert_invariant(engine: &Engine, train_id: TrainId) -> u32 {
    let snapshot = engine.store().snapshot(train_id).await.unwrap();
    let booked: u32 = snapshot.bookings.iter().map(|b| b.seats_booked).sum();
    assert_eq!(
        snapshot.train.available_seats + booked,
        snapshot.train.total_seats
    );
    snapshot.train.available_seats
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_requests_for_six_of_ten_seats() {
    let (engine, train_id) = setup(10).await;

    let handles: Vec<_> = (1..=2)
        .map(|user| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.reserve(UserId::new(user), train_id, 6).await })
        })
        .collect();

    let mut confirmed = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(booking) => {
                assert_eq!(booking.seats_booked, 6);
                confirmed += 1;
            }
            Err(ReservationError::InsufficientSeats {
                requested: 6,
                available: 4,
            }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!((confirmed, rejected), (1, 1));
    assert_eq!(assert_invariant(&engine, train_id).await, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_reservations_never_oversell() {
    const TOTAL: u32 = 25;
    let (engine, train_id) = setup(TOTAL).await;

    let handles: Vec<_> = (0..20_i64)
        .map(|i| {
            let engine = engine.clone();
            let seats = i % 3 + 1;
            tokio::spawn(async move { engine.reserve(UserId::new(i), train_id, seats).await })
        })
        .collect();

    let mut confirmed_seats = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(booking) => confirmed_seats += booking.seats_booked,
            Err(ReservationError::InsufficientSeats { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let available = assert_invariant(&engine, train_id).await;
    assert!(confirmed_seats <= TOTAL);
    assert_eq!(confirmed_seats + available, TOTAL);

    let ledger = engine.store().list_by_train(train_id).await.unwrap();
    let ledger_seats: u32 = ledger.iter().map(|b| b.seats_booked).sum();
    assert_eq!(ledger_seats, confirmed_seats);
}

#[tokio::test]
async fn rejected_reservations_leave_no_trace() {
    let (engine, train_id) = setup(3).await;

    assert!(matches!(
        engine.reserve(UserId::new(1), train_id, 0).await,
        Err(ReservationError::InvalidRequest(_))
    ));
    assert!(matches!(
        engine.reserve(UserId::new(1), train_id, 4).await,
        Err(ReservationError::InsufficientSeats { .. })
    ));
    assert!(matches!(
        engine.reserve(UserId::new(1), TrainId::new(i64::MAX), 1).await,
        Err(ReservationError::TrainNotFound(_))
    ));

    engine.reserve(UserId::new(1), train_id, 3).await.unwrap();
    assert_eq!(assert_invariant(&engine, train_id).await, 0);
    assert_eq!(engine.store().list_by_train(train_id).await.unwrap().len(), 1);
}
