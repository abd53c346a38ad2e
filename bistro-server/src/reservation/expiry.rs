//! Reservation expiry hook
//!
//! 预订本身没有 TTL：释放桌台只有取消和店主清台两条路径。部署方
//! 需要自动过期时实现本 trait (例如投递延时任务)，状态机本身不变。

use crate::db::models::Booking;
use async_trait::async_trait;

/// Called after a booking has been committed.
#[async_trait]
pub trait ReservationExpiry: Send + Sync + std::fmt::Debug {
    async fn on_booked(&self, booking: &Booking);
}

/// Default policy: bookings never expire on their own
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExpiry;

#[async_trait]
impl ReservationExpiry for NoExpiry {
    async fn on_booked(&self, _booking: &Booking) {}
}
