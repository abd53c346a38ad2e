//! Dining Table Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Table reservation state
///
/// 规范状态名为 `reserved`；历史客户端发送的 `occupied` 作为同义词
/// 接受，写入时归一化，绝不会出现第三种状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    #[serde(alias = "occupied")]
    Reserved,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Reserved => "reserved",
        }
    }
}

/// Dining table entity (桌台)
///
/// 状态只能由 ReservationManager 的操作驱动。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Restaurant reference
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    /// Unique per restaurant, > 0
    pub table_number: i64,
    pub status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Add table payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TableCreate {
    #[validate(range(min = 1))]
    pub table_number: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupied_is_an_alias_for_reserved() {
        let s: TableStatus = serde_json::from_str("\"occupied\"").unwrap();
        assert_eq!(s, TableStatus::Reserved);
        // Canonical name on output
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"reserved\"");
    }

    #[test]
    fn canonical_states_round_trip() {
        for (json, status) in [
            ("\"available\"", TableStatus::Available),
            ("\"reserved\"", TableStatus::Reserved),
        ] {
            let s: TableStatus = serde_json::from_str(json).unwrap();
            assert_eq!(s, status);
            assert_eq!(serde_json::to_string(&s).unwrap(), json);
        }
    }
}
