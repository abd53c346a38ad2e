//! Restaurant Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Restaurant entity (餐厅)
///
/// `geohash` 始终由服务端根据 latitude/longitude 重新计算，
/// 从不接受客户端传入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Spatial index key, server-computed from latitude/longitude
    pub geohash: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub open_time: String,
    #[serde(default)]
    pub close_time: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create restaurant payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RestaurantCreate {
    #[validate(length(min = 1))]
    pub owner_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub open_time: String,
    #[serde(default)]
    pub close_time: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

/// Update restaurant payload
///
/// latitude/longitude 任一变化时，仓储层在同一条 UPDATE 中重算 geohash。
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub price_range: Option<String>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Restaurant enriched with the great-circle distance to a search center
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantWithDistance {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub distance_km: f64,
}
