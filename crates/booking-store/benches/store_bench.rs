use std::time::Duration;

use booking_store::{
    BookingLedger, ExclusiveLease, InMemoryBookingStore, InventoryStore, NewBooking, NewTrain,
    TrainFilter, UserId,
};
use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};

fn new_train(number: usize, source: &str) -> NewTrain {
    NewTrain {
        train_number: format!("T{number}"),
        name: format!("Express {number}"),
        source: source.to_string(),
        destination: "Mumbai".to_string(),
        departure_time: Utc::now(),
        arrival_time: Utc::now(),
        total_seats: u32::MAX,
    }
}

fn bench_lease_append_commit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryBookingStore::new();
    let train = rt
        .block_on(store.create_train(new_train(0, "New Delhi")))
        .unwrap();

    c.bench_function("booking_store/lease_append_commit", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut lease = store
                    .acquire_exclusive(train.id, Duration::from_secs(1))
                    .await
                    .unwrap();
                store
                    .append(&mut lease, NewBooking::new(UserId::new(1), train.id, 1))
                    .await
                    .unwrap();
                let remaining = lease.train().available_seats - 1;
                store.commit(lease, remaining).await.unwrap();
            });
        });
    });
}

fn bench_find_trains_1000(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryBookingStore::new();

    rt.block_on(async {
        for i in 0..1000 {
            let source = if i % 10 == 0 { "New Delhi" } else { "Chennai" };
            store.create_train(new_train(i, source)).await.unwrap();
        }
    });

    c.bench_function("booking_store/find_trains_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                store
                    .find_trains(TrainFilter::new().source("delhi"))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_lease_append_commit, bench_find_trains_1000);
criterion_main!(benches);
