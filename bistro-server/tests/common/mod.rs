//! Shared test fixtures: one embedded database per test.
#![allow(dead_code)]

use bistro_server::db::define_schema;
use bistro_server::db::models::{Restaurant, RestaurantCreate};
use bistro_server::db::repository::RestaurantRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tempfile::TempDir;

/// Geohash precision stored on the index field
pub const PRECISION: usize = 10;

/// Open a fresh embedded database in a temp directory.
///
/// The TempDir must stay alive for the duration of the test.
pub async fn setup_db() -> (TempDir, Surreal<Db>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("test.db");
    let db: Surreal<Db> = Surreal::new::<RocksDb>(path.to_string_lossy().as_ref())
        .await
        .expect("open embedded db");
    db.use_ns("bistro").use_db("main").await.expect("select ns/db");
    define_schema(&db).await.expect("define schema");
    (dir, db)
}

pub fn restaurant_payload(owner: &str, name: &str, lat: f64, lng: f64) -> RestaurantCreate {
    RestaurantCreate {
        owner_id: owner.to_string(),
        name: name.to_string(),
        latitude: lat,
        longitude: lng,
        address: String::new(),
        price_range: "$$".to_string(),
        open_time: "09:00".to_string(),
        close_time: "22:00".to_string(),
        rating: 4.0,
        description: String::new(),
        image_url: String::new(),
    }
}

pub async fn create_restaurant(
    db: &Surreal<Db>,
    owner: &str,
    name: &str,
    lat: f64,
    lng: f64,
) -> Restaurant {
    RestaurantRepository::new(db.clone(), PRECISION)
        .create(restaurant_payload(owner, name, lat, lng))
        .await
        .expect("create restaurant")
}

/// String form of a record id ("table:id")
pub fn id_str(id: &Option<surrealdb::RecordId>) -> String {
    id.as_ref().expect("record id").to_string()
}
