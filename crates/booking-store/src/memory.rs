use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::{
    Booking, BookingId, NewBooking, NewTrain, Result, StoreError, Train, TrainFilter, TrainId,
    UserId,
    store::{
        BookingLedger, ExclusiveLease, InventoryStore, TrainSnapshot, validate_append,
        validate_commit,
    },
};

/// Committed state of one train: its record and its ledger entries.
struct SlotRecord {
    train: Train,
    bookings: Vec<Booking>,
}

/// Per-train storage. `gate` serializes leases; `record` is what readers see.
struct TrainSlot {
    gate: Arc<Mutex<()>>,
    record: RwLock<SlotRecord>,
}

#[derive(Default)]
struct Catalog {
    slots: BTreeMap<TrainId, Arc<TrainSlot>>,
    by_number: HashMap<String, TrainId>,
}

/// In-memory booking store.
///
/// Each train lives in its own slot. A lease holds the slot's gate until it
/// commits or is dropped, and a commit swaps the seat count and the staged
/// bookings in under a single write lock of that slot, so readers see both or
/// neither. The catalog lock is only held to look a slot up.
#[derive(Clone)]
pub struct InMemoryBookingStore {
    catalog: Arc<RwLock<Catalog>>,
    next_train_id: Arc<AtomicI64>,
    next_booking_id: Arc<AtomicI64>,
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Catalog::default())),
            next_train_id: Arc::new(AtomicI64::new(1)),
            next_booking_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl InMemoryBookingStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of trains stored.
    pub async fn train_count(&self) -> usize {
        self.catalog.read().await.slots.len()
    }

    /// Returns the number of committed bookings across all trains.
    pub async fn booking_count(&self) -> usize {
        let mut count = 0;
        for slot in self.all_slots().await {
            count += slot.record.read().await.bookings.len();
        }
        count
    }

    async fn slot(&self, train_id: TrainId) -> Result<Arc<TrainSlot>> {
        self.catalog
            .read()
            .await
            .slots
            .get(&train_id)
            .cloned()
            .ok_or(StoreError::TrainNotFound(train_id))
    }

    async fn all_slots(&self) -> Vec<Arc<TrainSlot>> {
        self.catalog.read().await.slots.values().cloned().collect()
    }
}

/// Lease over one in-memory train slot.
pub struct InMemoryLease {
    slot: Arc<TrainSlot>,
    train: Train,
    staged: Vec<Booking>,
    _guard: OwnedMutexGuard<()>,
}

impl ExclusiveLease for InMemoryLease {
    fn train(&self) -> &Train {
        &self.train
    }

    fn staged_seats(&self) -> u32 {
        self.staged.iter().map(|b| b.seats_booked).sum()
    }
}

impl std::fmt::Debug for InMemoryLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLease")
            .field("train_id", &self.train.id)
            .field("staged", &self.staged.len())
            .finish()
    }
}

#[async_trait]
impl InventoryStore for InMemoryBookingStore {
    type Lease = InMemoryLease;

    async fn create_train(&self, new: NewTrain) -> Result<Train> {
        let mut catalog = self.catalog.write().await;

        if catalog.by_number.contains_key(&new.train_number) {
            return Err(StoreError::DuplicateTrainNumber(new.train_number));
        }

        let id = TrainId::new(self.next_train_id.fetch_add(1, Ordering::Relaxed));
        let train = Train::from_new(id, new);

        catalog.by_number.insert(train.train_number.clone(), id);
        catalog.slots.insert(
            id,
            Arc::new(TrainSlot {
                gate: Arc::new(Mutex::new(())),
                record: RwLock::new(SlotRecord {
                    train: train.clone(),
                    bookings: Vec::new(),
                }),
            }),
        );

        Ok(train)
    }

    async fn get(&self, train_id: TrainId) -> Result<Train> {
        let slot = self.slot(train_id).await?;
        let record = slot.record.read().await;
        Ok(record.train.clone())
    }

    async fn find_trains(&self, filter: TrainFilter) -> Result<Vec<Train>> {
        let limit = filter.limit.unwrap_or(usize::MAX);
        let mut trains = Vec::new();

        // Slots come out of the BTreeMap in ID order.
        for slot in self.all_slots().await {
            if trains.len() >= limit {
                break;
            }
            let record = slot.record.read().await;
            if filter.matches(&record.train) {
                trains.push(record.train.clone());
            }
        }

        Ok(trains)
    }

    async fn acquire_exclusive(&self, train_id: TrainId, wait: Duration) -> Result<InMemoryLease> {
        let slot = self.slot(train_id).await?;

        let guard = tokio::time::timeout(wait, slot.gate.clone().lock_owned())
            .await
            .map_err(|_| {
                tracing::debug!(%train_id, ?wait, "train lease wait expired");
                StoreError::LockTimeout(train_id)
            })?;

        let train = slot.record.read().await.train.clone();

        Ok(InMemoryLease {
            slot,
            train,
            staged: Vec::new(),
            _guard: guard,
        })
    }

    async fn commit(&self, lease: InMemoryLease, new_available: u32) -> Result<Train> {
        validate_commit(&lease.train, lease.staged_seats(), new_available)?;

        let InMemoryLease {
            slot,
            staged,
            _guard: guard,
            ..
        } = lease;

        let train = {
            let mut record = slot.record.write().await;
            record.train.available_seats = new_available;
            record.bookings.extend(staged);
            record.train.clone()
        };

        drop(guard);
        Ok(train)
    }
}

#[async_trait]
impl BookingLedger for InMemoryBookingStore {
    async fn append(&self, lease: &mut InMemoryLease, entry: NewBooking) -> Result<Booking> {
        validate_append(lease, &entry)?;

        let booking = Booking {
            id: BookingId::new(self.next_booking_id.fetch_add(1, Ordering::Relaxed)),
            user_id: entry.user_id,
            train_id: entry.train_id,
            seats_booked: entry.seats_booked,
            booking_date: Utc::now(),
        };
        lease.staged.push(booking.clone());

        Ok(booking)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let mut bookings = Vec::new();
        for slot in self.all_slots().await {
            let record = slot.record.read().await;
            bookings.extend(
                record
                    .bookings
                    .iter()
                    .filter(|b| b.user_id == user_id)
                    .cloned(),
            );
        }
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }

    async fn list_by_train(&self, train_id: TrainId) -> Result<Vec<Booking>> {
        let slot = self.slot(train_id).await?;
        let mut bookings = slot.record.read().await.bookings.clone();
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }

    async fn snapshot(&self, train_id: TrainId) -> Result<TrainSnapshot> {
        let slot = self.slot(train_id).await?;
        let record = slot.record.read().await;
        let mut bookings = record.bookings.clone();
        bookings.sort_by_key(|b| b.id);
        Ok(TrainSnapshot {
            train: record.train.clone(),
            bookings,
        })
    }
}
