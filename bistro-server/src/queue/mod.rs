//! Queue View
//!
//! 纯读投影：用户当前排队 (未关闭预订) 和餐厅桌台快照。
//! 不发生任何状态迁移，迁移一律走 ReservationManager。

use crate::db::models::{ActiveBooking, DiningTable};
use crate::db::repository::{BookingRepository, RepoResult, TableRepository, parse_record_id};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct QueueView {
    bookings: BookingRepository,
    tables: TableRepository,
}

impl QueueView {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            bookings: BookingRepository::new(db.clone()),
            tables: TableRepository::new(db),
        }
    }

    /// All open bookings of a user, most recent first, joined with
    /// restaurant name and table number
    pub async fn my_active_bookings(&self, user_id: &str) -> RepoResult<Vec<ActiveBooking>> {
        self.bookings.active_for_user(user_id).await
    }

    /// All tables of a restaurant, ordered by table number
    pub async fn tables_of(&self, restaurant_id: &str) -> RepoResult<Vec<DiningTable>> {
        let restaurant = parse_record_id(restaurant_id, "restaurant")?;
        self.tables.find_by_restaurant(&restaurant).await
    }

    /// The user's most recent open booking at one restaurant, if any
    pub async fn my_booking_at(
        &self,
        restaurant_id: &str,
        user_id: &str,
    ) -> RepoResult<Option<ActiveBooking>> {
        let restaurant = parse_record_id(restaurant_id, "restaurant")?;
        self.bookings.active_at_restaurant(&restaurant, user_id).await
    }
}
