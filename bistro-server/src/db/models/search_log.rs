//! Search Log Model
//!
//! Write-only audit record for nearby searches; never read by any
//! in-scope component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLog {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
