//! Reservation Manager
//!
//! 桌台/预订状态机：`available → reserved → available`。
//!
//! 每个改变桌台状态并创建/关闭预订的写入都是一条 SurrealDB 事务
//! (`BEGIN … COMMIT`，`THROW` 中止)：状态前置条件在提交时求值，
//! 等价于 compare-and-swap，绝不是两次往返的先读后写。并发预订
//! 同一桌台时最多一个调用成功，其余得到 [`ReservationError::AlreadyReserved`]。

mod expiry;

pub use expiry::{NoExpiry, ReservationExpiry};

use crate::db::models::{Booking, DiningTable};
use crate::db::repository::{RepoError, TableRepository, parse_record_id};
use crate::utils::AppError;
use std::sync::Arc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Reservation state machine errors
#[derive(Debug, Error)]
pub enum ReservationError {
    /// 并发预订冲突：提交时桌台已不是 available
    #[error("Table not available")]
    AlreadyReserved,

    /// 幂等的重复取消
    #[error("Booking already canceled")]
    AlreadyCanceled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::AlreadyReserved => AppError::AlreadyReserved,
            ReservationError::AlreadyCanceled => AppError::AlreadyCanceled,
            ReservationError::NotFound(msg) => AppError::NotFound(msg),
            ReservationError::Conflict(msg) => AppError::Conflict(msg),
            ReservationError::Repo(e) => e.into(),
        }
    }
}

pub type ReservationResult<T> = Result<T, ReservationError>;

// THROW sentinels used inside the transactions
const ERR_RESTAURANT_NOT_FOUND: &str = "RESTAURANT_NOT_FOUND";
const ERR_TABLE_NOT_FOUND: &str = "TABLE_NOT_FOUND";
const ERR_BOOKING_NOT_FOUND: &str = "BOOKING_NOT_FOUND";
const ERR_TABLE_NOT_AVAILABLE: &str = "TABLE_NOT_AVAILABLE";
const ERR_ALREADY_CANCELED: &str = "ALREADY_CANCELED";
const ERR_TABLE_BOOKED: &str = "TABLE_BOOKED";

/// 存储层乐观事务冲突，可安全重试 (与业务冲突 AlreadyReserved 无关)
fn is_txn_conflict(msg: &str) -> bool {
    msg.contains("read or write conflict") || msg.contains("can be retried")
}

/// Bounded retries for storage-level transaction conflicts
const TXN_RETRIES: usize = 8;

#[derive(Clone)]
pub struct ReservationManager {
    db: Surreal<Db>,
    tables: TableRepository,
    expiry: Arc<dyn ReservationExpiry>,
}

impl ReservationManager {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            tables: TableRepository::new(db.clone()),
            db,
            expiry: Arc::new(NoExpiry),
        }
    }

    /// Swap in a reservation expiry policy (default: none)
    pub fn with_expiry(mut self, expiry: Arc<dyn ReservationExpiry>) -> Self {
        self.expiry = expiry;
        self
    }

    fn classify(msg: &str) -> ReservationError {
        if msg.contains(ERR_TABLE_NOT_AVAILABLE) {
            ReservationError::AlreadyReserved
        } else if msg.contains(ERR_ALREADY_CANCELED) {
            ReservationError::AlreadyCanceled
        } else if msg.contains(ERR_TABLE_NOT_FOUND) {
            ReservationError::NotFound("Table not found".to_string())
        } else if msg.contains(ERR_BOOKING_NOT_FOUND) {
            ReservationError::NotFound("Booking not found".to_string())
        } else if msg.contains(ERR_RESTAURANT_NOT_FOUND) {
            ReservationError::NotFound("Restaurant not found".to_string())
        } else if msg.contains(ERR_TABLE_BOOKED) {
            ReservationError::Conflict("Table has an open booking".to_string())
        } else {
            ReservationError::Repo(RepoError::Database(msg.to_string()))
        }
    }

    /// Extract the first business failure out of a (possibly aborted)
    /// transaction response.
    ///
    /// 事务被 THROW 中止时，其余语句都报 "cancelled transaction"；
    /// 真正的哨兵信息挂在抛出的那条语句上，必须全量扫描。
    fn take_failure(resp: &mut surrealdb::Response) -> Option<ReservationError> {
        let errors = resp.take_errors();
        if errors.is_empty() {
            return None;
        }
        let messages: Vec<String> = errors.into_values().map(|e| e.to_string()).collect();
        for msg in &messages {
            let classified = Self::classify(msg);
            if !matches!(classified, ReservationError::Repo(_)) {
                return Some(classified);
            }
        }
        // No sentinel: prefer a retryable storage conflict over the
        // generic cancellation notice
        let msg = messages
            .iter()
            .find(|m| is_txn_conflict(m))
            .or_else(|| messages.first())
            .cloned()
            .unwrap_or_default();
        Some(ReservationError::Repo(RepoError::Database(msg)))
    }

    /// Reserve a table for a user.
    ///
    /// 前置条件 (提交时检查)：桌台存在且属于该餐厅、状态为
    /// `available`、没有未关闭的预订。成功时在同一事务内创建
    /// `canceled_at = NONE` 的预订。
    pub async fn book_table(
        &self,
        restaurant_id: &str,
        table_id: &str,
        user_id: &str,
    ) -> ReservationResult<Booking> {
        let restaurant = parse_record_id(restaurant_id, "restaurant")?;
        let table = parse_record_id(table_id, "dining_table")?;

        let mut last_err = None;
        for _ in 0..TXN_RETRIES {
            match self.try_book(&restaurant, &table, user_id).await {
                Ok(booking) => {
                    self.expiry.on_booked(&booking).await;
                    return Ok(booking);
                }
                Err(err) => {
                    let retryable =
                        matches!(&err, ReservationError::Repo(RepoError::Database(msg)) if is_txn_conflict(msg));
                    if !retryable {
                        return Err(err);
                    }
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or(ReservationError::AlreadyReserved))
    }

    async fn try_book(
        &self,
        restaurant: &RecordId,
        table: &RecordId,
        user_id: &str,
    ) -> ReservationResult<Booking> {
        let mut resp = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $t = (SELECT * FROM $table WHERE restaurant = $restaurant);
                 IF array::len($t) == 0 { THROW 'TABLE_NOT_FOUND' };
                 LET $locked = (UPDATE $table SET status = 'reserved', updated_at = time::now() \
                     WHERE status = 'available');
                 IF array::len($locked) == 0 { THROW 'TABLE_NOT_AVAILABLE' };
                 LET $open = (SELECT id FROM booking WHERE dining_table = $table AND canceled_at = NONE);
                 IF array::len($open) > 0 { THROW 'TABLE_NOT_AVAILABLE' };
                 LET $created = (CREATE booking SET restaurant = $restaurant, dining_table = $table, \
                     user_id = $user_id, reserved_at = time::now(), canceled_at = NONE, \
                     created_at = time::now());
                 RETURN $created[0];
                 COMMIT TRANSACTION;",
            )
            .bind(("restaurant", restaurant.clone()))
            .bind(("table", table.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))?;

        if let Some(err) = Self::take_failure(&mut resp) {
            return Err(err);
        }
        let last = resp.num_statements() - 1;
        let booking: Option<Booking> = resp.take(last).map_err(RepoError::from)?;
        booking.ok_or_else(|| {
            ReservationError::Repo(RepoError::Database("Booking row missing after commit".into()))
        })
    }

    /// Close a booking and release its table.
    ///
    /// 幂等：重复取消返回 [`ReservationError::AlreadyCanceled`]。桌台
    /// 只有在没有其它未关闭预订时才翻回 available (防御数据腐化)。
    pub async fn cancel_booking(&self, booking_id: &str) -> ReservationResult<Booking> {
        let booking = parse_record_id(booking_id, "booking")?;

        let mut last_err = None;
        for _ in 0..TXN_RETRIES {
            match self.try_cancel(&booking).await {
                Ok(closed) => return Ok(closed),
                Err(err) => {
                    let retryable =
                        matches!(&err, ReservationError::Repo(RepoError::Database(msg)) if is_txn_conflict(msg));
                    if !retryable {
                        return Err(err);
                    }
                    last_err = Some(err);
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| ReservationError::Repo(RepoError::Database("cancel failed".into()))))
    }

    async fn try_cancel(&self, booking: &RecordId) -> ReservationResult<Booking> {
        let mut resp = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $b = (SELECT * FROM $booking);
                 IF array::len($b) == 0 { THROW 'BOOKING_NOT_FOUND' };
                 IF $b[0].canceled_at != NONE { THROW 'ALREADY_CANCELED' };
                 LET $closed = (UPDATE $booking SET canceled_at = time::now());
                 LET $tid = $b[0].dining_table;
                 LET $others = (SELECT id FROM booking \
                     WHERE dining_table = $tid AND canceled_at = NONE AND id != $booking);
                 IF array::len($others) == 0 {
                     UPDATE $tid SET status = 'available', updated_at = time::now();
                 };
                 RETURN $closed[0];
                 COMMIT TRANSACTION;",
            )
            .bind(("booking", booking.clone()))
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))?;

        if let Some(err) = Self::take_failure(&mut resp) {
            return Err(err);
        }
        let last = resp.num_statements() - 1;
        let closed: Option<Booking> = resp.take(last).map_err(RepoError::from)?;
        closed.ok_or_else(|| {
            ReservationError::Repo(RepoError::Database("Booking row missing after cancel".into()))
        })
    }

    /// Owner override: force a table back to `available`.
    ///
    /// 同一事务内关闭该桌台的所有未关闭预订 — 否则下一次 book_table
    /// 会给同一桌台造出第二条 open booking，破坏核心不变量。
    pub async fn clear_table(
        &self,
        restaurant_id: &str,
        table_id: &str,
    ) -> ReservationResult<DiningTable> {
        let restaurant = parse_record_id(restaurant_id, "restaurant")?;
        let table = parse_record_id(table_id, "dining_table")?;

        let mut resp = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $t = (SELECT * FROM $table WHERE restaurant = $restaurant);
                 IF array::len($t) == 0 { THROW 'TABLE_NOT_FOUND' };
                 UPDATE booking SET canceled_at = time::now() \
                     WHERE dining_table = $table AND canceled_at = NONE;
                 LET $updated = (UPDATE $table SET status = 'available', updated_at = time::now());
                 RETURN $updated[0];
                 COMMIT TRANSACTION;",
            )
            .bind(("restaurant", restaurant))
            .bind(("table", table))
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))?;

        if let Some(err) = Self::take_failure(&mut resp) {
            return Err(err);
        }
        let last = resp.num_statements() - 1;
        let cleared: Option<DiningTable> = resp.take(last).map_err(RepoError::from)?;
        cleared.ok_or_else(|| ReservationError::NotFound("Table not found".to_string()))
    }

    /// Owner override applied to every non-available table of a restaurant.
    ///
    /// Returns the number of tables released.
    pub async fn clear_all_tables(&self, restaurant_id: &str) -> ReservationResult<usize> {
        let restaurant = parse_record_id(restaurant_id, "restaurant")?;

        let mut resp = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $r = (SELECT id FROM $restaurant);
                 IF array::len($r) == 0 { THROW 'RESTAURANT_NOT_FOUND' };
                 UPDATE booking SET canceled_at = time::now() \
                     WHERE restaurant = $restaurant AND canceled_at = NONE;
                 LET $updated = (UPDATE dining_table SET status = 'available', updated_at = time::now() \
                     WHERE restaurant = $restaurant AND status != 'available');
                 RETURN array::len($updated);
                 COMMIT TRANSACTION;",
            )
            .bind(("restaurant", restaurant))
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))?;

        if let Some(err) = Self::take_failure(&mut resp) {
            return Err(err);
        }
        let last = resp.num_statements() - 1;
        let released: Option<usize> = resp.take(last).map_err(RepoError::from)?;
        Ok(released.unwrap_or(0))
    }

    /// Owner: add a table with `status = available`
    pub async fn add_table(
        &self,
        restaurant_id: &str,
        table_number: i64,
    ) -> ReservationResult<DiningTable> {
        let restaurant = parse_record_id(restaurant_id, "restaurant")?;
        #[derive(serde::Deserialize)]
        struct ExistsRow {
            #[allow(dead_code)]
            id: RecordId,
        }
        let found: Vec<ExistsRow> = self
            .db
            .query("SELECT id FROM $restaurant")
            .bind(("restaurant", restaurant.clone()))
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))?
            .take(0)
            .map_err(RepoError::from)?;
        if found.is_empty() {
            return Err(ReservationError::NotFound(format!(
                "Restaurant {} not found",
                restaurant_id
            )));
        }
        Ok(self.tables.create(&restaurant, table_number).await?)
    }

    /// Owner: remove a table.
    ///
    /// Refuses while an open booking references it.
    pub async fn remove_table(
        &self,
        restaurant_id: &str,
        table_id: &str,
    ) -> ReservationResult<bool> {
        let restaurant = parse_record_id(restaurant_id, "restaurant")?;
        let table = parse_record_id(table_id, "dining_table")?;

        let mut resp = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $t = (SELECT * FROM $table WHERE restaurant = $restaurant);
                 IF array::len($t) == 0 { THROW 'TABLE_NOT_FOUND' };
                 LET $open = (SELECT id FROM booking WHERE dining_table = $table AND canceled_at = NONE);
                 IF array::len($open) > 0 { THROW 'TABLE_BOOKED' };
                 DELETE $table;
                 COMMIT TRANSACTION;",
            )
            .bind(("restaurant", restaurant))
            .bind(("table", table))
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))?;

        if let Some(err) = Self::take_failure(&mut resp) {
            return Err(err);
        }
        Ok(true)
    }
}
