//! Booking Repository
//!
//! Read side of the booking ledger. Creation and closing happen inside
//! ReservationManager transactions.

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::{ActiveBooking, Booking};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "booking";

/// 连接查询的投影字段：booking + 餐厅名 + 桌号
const ACTIVE_PROJECTION: &str = "<string>id AS booking_id, user_id, reserved_at, \
     <string>restaurant AS restaurant_id, restaurant.name AS restaurant_name, \
     <string>dining_table AS table_id, dining_table.table_number AS table_number";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing = parse_record_id(id, TABLE)?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking)
    }

    /// Open bookings referencing a table (invariant: length <= 1)
    pub async fn open_for_table(&self, table: &RecordId) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE dining_table = $table AND canceled_at = NONE")
            .bind(("table", table.clone()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// All open bookings of a user joined with restaurant name and table
    /// number, most recent first
    pub async fn active_for_user(&self, user_id: &str) -> RepoResult<Vec<ActiveBooking>> {
        let rows: Vec<ActiveBooking> = self
            .base
            .db()
            .query(format!(
                "SELECT {ACTIVE_PROJECTION} FROM booking \
                 WHERE user_id = $user_id AND canceled_at = NONE \
                 ORDER BY reserved_at DESC"
            ))
            .bind(("user_id", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// The user's most recent open booking at one restaurant, if any
    pub async fn active_at_restaurant(
        &self,
        restaurant: &RecordId,
        user_id: &str,
    ) -> RepoResult<Option<ActiveBooking>> {
        let rows: Vec<ActiveBooking> = self
            .base
            .db()
            .query(format!(
                "SELECT {ACTIVE_PROJECTION} FROM booking \
                 WHERE restaurant = $restaurant AND user_id = $user_id AND canceled_at = NONE \
                 ORDER BY reserved_at DESC"
            ))
            .bind(("restaurant", restaurant.clone()))
            .bind(("user_id", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }
}
