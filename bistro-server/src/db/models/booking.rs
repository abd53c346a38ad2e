//! Booking Model
//!
//! Append-mostly ledger: a booking is created once and later closed by
//! setting `canceled_at`. Core invariant: per table at most one booking
//! with `canceled_at = NONE` at any time.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Booking entity (预订台账)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub dining_table: RecordId,
    pub user_id: String,
    pub reserved_at: Option<DateTime<Utc>>,
    /// NONE while the booking is open
    #[serde(default)]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// 仍然占用桌台的预订
    pub fn is_open(&self) -> bool {
        self.canceled_at.is_none()
    }
}

/// Book table payload (user_id defaults to "anon" like the legacy client)
#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreate {
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_user() -> String {
    "anon".to_string()
}

/// Queue projection row: booking joined with restaurant name and table number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveBooking {
    pub booking_id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub table_id: String,
    pub table_number: i64,
    pub user_id: String,
    pub reserved_at: Option<DateTime<Utc>>,
}
