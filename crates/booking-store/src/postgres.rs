use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    Booking, BookingId, NewBooking, NewTrain, Result, StoreError, Train, TrainFilter, TrainId,
    UserId,
    store::{
        BookingLedger, ExclusiveLease, InventoryStore, TrainSnapshot, validate_append,
        validate_commit,
    },
};

/// SQLSTATE raised when `lock_timeout` expires.
const LOCK_NOT_AVAILABLE: &str = "55P03";

const TRAIN_COLUMNS: &str = "id, train_number, name, source, destination, departure_time, arrival_time, total_seats, available_seats";
const BOOKING_COLUMNS: &str = "id, user_id, train_id, seats_booked, booking_date";

/// PostgreSQL-backed booking store.
///
/// A lease is an open transaction holding a `SELECT ... FOR UPDATE` row lock
/// on the train; ledger entries are inserted inside that transaction, so the
/// seat update and the bookings commit together. Dropping the lease rolls the
/// transaction back and releases the row.
#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Creates a new PostgreSQL booking store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("booking store migrations applied");
        Ok(())
    }

    fn row_to_train(row: PgRow) -> Result<Train> {
        Ok(Train {
            id: TrainId::new(row.try_get("id")?),
            train_number: row.try_get("train_number")?,
            name: row.try_get("name")?,
            source: row.try_get("source")?,
            destination: row.try_get("destination")?,
            departure_time: row.try_get("departure_time")?,
            arrival_time: row.try_get("arrival_time")?,
            total_seats: seat_count(row.try_get("total_seats")?, "total_seats")?,
            available_seats: seat_count(row.try_get("available_seats")?, "available_seats")?,
        })
    }

    fn row_to_booking(row: PgRow) -> Result<Booking> {
        Ok(Booking {
            id: BookingId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            train_id: TrainId::new(row.try_get("train_id")?),
            seats_booked: seat_count(row.try_get("seats_booked")?, "seats_booked")?,
            booking_date: row.try_get("booking_date")?,
        })
    }
}

fn seat_count(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| StoreError::Corrupted(format!("{column} = {value}")))
}

/// Wraps a substring in `%` after escaping the LIKE metacharacters.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn is_lock_timeout(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(LOCK_NOT_AVAILABLE))
}

/// Lease over one train row, backed by an open transaction.
pub struct PgLease {
    tx: Transaction<'static, Postgres>,
    train: Train,
    staged_seats: u32,
}

impl ExclusiveLease for PgLease {
    fn train(&self) -> &Train {
        &self.train
    }

    fn staged_seats(&self) -> u32 {
        self.staged_seats
    }
}

#[async_trait]
impl InventoryStore for PostgresBookingStore {
    type Lease = PgLease;

    async fn create_train(&self, new: NewTrain) -> Result<Train> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO trains (train_number, name, source, destination, departure_time, arrival_time, total_seats, available_seats)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {TRAIN_COLUMNS}
            "#
        ))
        .bind(&new.train_number)
        .bind(&new.name)
        .bind(&new.source)
        .bind(&new.destination)
        .bind(new.departure_time)
        .bind(new.arrival_time)
        .bind(i64::from(new.total_seats))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateTrainNumber(new.train_number.clone());
            }
            StoreError::Database(e)
        })?;

        Self::row_to_train(row)
    }

    async fn get(&self, train_id: TrainId) -> Result<Train> {
        let row = sqlx::query(&format!("SELECT {TRAIN_COLUMNS} FROM trains WHERE id = $1"))
            .bind(train_id.as_i64())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::TrainNotFound(train_id))?;

        Self::row_to_train(row)
    }

    async fn find_trains(&self, filter: TrainFilter) -> Result<Vec<Train>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {TRAIN_COLUMNS}
            FROM trains
            WHERE ($1::text IS NULL OR source ILIKE $1)
              AND ($2::text IS NULL OR destination ILIKE $2)
            ORDER BY id ASC
            LIMIT $3
            "#
        ))
        .bind(filter.source.as_deref().map(like_pattern))
        .bind(filter.destination.as_deref().map(like_pattern))
        .bind(filter.limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX)))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_train).collect()
    }

    async fn acquire_exclusive(&self, train_id: TrainId, wait: Duration) -> Result<PgLease> {
        let started = Instant::now();

        // Waiting for a pooled connection counts against the same bound as
        // the row lock.
        let mut tx = match tokio::time::timeout(wait, self.pool.begin()).await {
            Ok(Ok(tx)) => tx,
            Ok(Err(sqlx::Error::PoolTimedOut)) | Err(_) => {
                tracing::debug!(%train_id, ?wait, "no pooled connection within lease wait");
                return Err(StoreError::LockTimeout(train_id));
            }
            Ok(Err(e)) => return Err(e.into()),
        };

        // A zero lock_timeout disables the limit, so never go below 1ms.
        let wait_ms = wait.saturating_sub(started.elapsed()).as_millis().max(1);
        sqlx::query(&format!("SET LOCAL lock_timeout = '{wait_ms}ms'"))
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(&format!(
            "SELECT {TRAIN_COLUMNS} FROM trains WHERE id = $1 FOR UPDATE"
        ))
        .bind(train_id.as_i64())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if is_lock_timeout(&e) {
                tracing::debug!(%train_id, wait_ms, "row lock wait expired");
                StoreError::LockTimeout(train_id)
            } else {
                StoreError::Database(e)
            }
        })?
        .ok_or(StoreError::TrainNotFound(train_id))?;

        Ok(PgLease {
            tx,
            train: Self::row_to_train(row)?,
            staged_seats: 0,
        })
    }

    async fn commit(&self, lease: PgLease, new_available: u32) -> Result<Train> {
        validate_commit(&lease.train, lease.staged_seats, new_available)?;

        let PgLease { mut tx, train, .. } = lease;

        let row = sqlx::query(&format!(
            "UPDATE trains SET available_seats = $2 WHERE id = $1 RETURNING {TRAIN_COLUMNS}"
        ))
        .bind(train.id.as_i64())
        .bind(i64::from(new_available))
        .fetch_one(&mut *tx)
        .await?;
        let train = Self::row_to_train(row)?;

        tx.commit().await?;
        Ok(train)
    }
}

#[async_trait]
impl BookingLedger for PostgresBookingStore {
    async fn append(&self, lease: &mut PgLease, entry: NewBooking) -> Result<Booking> {
        validate_append(lease, &entry)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (user_id, train_id, seats_booked, booking_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(entry.user_id.as_i64())
        .bind(entry.train_id.as_i64())
        .bind(i64::from(entry.seats_booked))
        .bind(Utc::now())
        .fetch_one(&mut *lease.tx)
        .await?;

        lease.staged_seats += entry.seats_booked;
        Self::row_to_booking(row)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY id ASC"
        ))
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_booking).collect()
    }

    async fn list_by_train(&self, train_id: TrainId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE train_id = $1 ORDER BY id ASC"
        ))
        .bind(train_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_booking).collect()
    }

    async fn snapshot(&self, train_id: TrainId) -> Result<TrainSnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let train_row = sqlx::query(&format!("SELECT {TRAIN_COLUMNS} FROM trains WHERE id = $1"))
            .bind(train_id.as_i64())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::TrainNotFound(train_id))?;

        let booking_rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE train_id = $1 ORDER BY id ASC"
        ))
        .bind(train_id.as_i64())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(TrainSnapshot {
            train: Self::row_to_train(train_row)?,
            bookings: booking_rows
                .into_iter()
                .map(Self::row_to_booking)
                .collect::<Result<_>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("Delhi"), "%Delhi%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn negative_seat_counts_are_corrupt() {
        assert_eq!(seat_count(12, "total_seats").unwrap(), 12);
        assert!(matches!(
            seat_count(-1, "total_seats"),
            Err(StoreError::Corrupted(_))
        ));
    }
}
