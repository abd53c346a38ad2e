//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB backend). The connection is owned
//! by [`DbService`] and handed to repositories explicitly; there is no
//! module-level client.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "bistro";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::unavailable(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::unavailable(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!(path = %db_path, "Database connection established (SurrealDB embedded)");
        Ok(Self { db })
    }
}

/// Apply table and index definitions (idempotent).
///
/// geohash 索引是邻近搜索的范围扫描入口；
/// (restaurant, table_number) 唯一索引兜底并发加桌的重号。
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS restaurant SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS restaurant_geohash ON restaurant FIELDS geohash;
        DEFINE INDEX IF NOT EXISTS restaurant_owner ON restaurant FIELDS owner_id;

        DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS table_restaurant ON dining_table FIELDS restaurant;
        DEFINE INDEX IF NOT EXISTS table_number_unique ON dining_table FIELDS restaurant, table_number UNIQUE;

        DEFINE TABLE IF NOT EXISTS booking SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS booking_table ON booking FIELDS dining_table;
        DEFINE INDEX IF NOT EXISTS booking_user ON booking FIELDS user_id;

        DEFINE TABLE IF NOT EXISTS search_log SCHEMALESS;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
