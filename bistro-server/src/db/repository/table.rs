//! Dining Table Repository
//!
//! 简单 CRUD 与查询；涉及状态迁移的写入一律走 ReservationManager
//! 的事务，不在这里提供。

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{DiningTable, TableStatus};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct TableRepository {
    base: BaseRepository,
}

impl TableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing = parse_record_id(id, TABLE)?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find a table scoped to its restaurant (guards cross-restaurant ids)
    pub async fn find_in_restaurant(
        &self,
        restaurant: &RecordId,
        table_id: &str,
    ) -> RepoResult<Option<DiningTable>> {
        let thing = parse_record_id(table_id, TABLE)?;
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM $table WHERE restaurant = $restaurant")
            .bind(("table", thing))
            .bind(("restaurant", restaurant.clone()))
            .await?
            .take(0)?;
        Ok(tables.into_iter().next())
    }

    /// All tables of a restaurant, ordered by table number
    pub async fn find_by_restaurant(&self, restaurant: &RecordId) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE restaurant = $restaurant ORDER BY table_number",
            )
            .bind(("restaurant", restaurant.clone()))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Create a table with `status = available`
    pub async fn create(&self, restaurant: &RecordId, table_number: i64) -> RepoResult<DiningTable> {
        if table_number <= 0 {
            return Err(RepoError::Validation(format!(
                "Invalid table number: {}",
                table_number
            )));
        }

        let created: Result<Vec<DiningTable>, surrealdb::Error> = async {
            self.base
                .db()
                .query(
                    "CREATE dining_table SET restaurant = $restaurant, \
                     table_number = $table_number, status = $status, updated_at = time::now()",
                )
                .bind(("restaurant", restaurant.clone()))
                .bind(("table_number", table_number))
                .bind(("status", TableStatus::Available.as_str()))
                .await?
                .take(0)
        }
        .await;

        match created {
            Ok(tables) => tables
                .into_iter()
                .next()
                .ok_or_else(|| RepoError::Database("Failed to create table".to_string())),
            // 唯一索引 (restaurant, table_number) 兜底并发重号
            Err(e) if e.to_string().contains("table_number_unique") => Err(RepoError::Duplicate(
                format!("Table {} already exists in this restaurant", table_number),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
