//! Restaurant Repository
//!
//! geohash 不变量由本仓储维护：任何写入 latitude/longitude 的语句
//! 都在同一操作中重算 geohash。

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use crate::geo;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "restaurant";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
    /// Geohash length stored on the index field
    precision: usize,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>, precision: usize) -> Self {
        Self {
            base: BaseRepository::new(db),
            precision,
        }
    }

    fn geohash_for(&self, lat: f64, lng: f64) -> RepoResult<String> {
        geo::encode(lat, lng, self.precision).map_err(|e| RepoError::Validation(e.to_string()))
    }

    /// Find restaurant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let thing = parse_record_id(id, TABLE)?;
        let restaurant: Option<Restaurant> = self.base.db().select(thing).await?;
        Ok(restaurant)
    }

    /// Find all restaurants created by an owner, newest first
    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Restaurant>> {
        let restaurants: Vec<Restaurant> = self
            .base
            .db()
            .query("SELECT * FROM restaurant WHERE owner_id = $owner_id ORDER BY created_at DESC")
            .bind(("owner_id", owner_id.to_string()))
            .await?
            .take(0)?;
        Ok(restaurants)
    }

    /// Indexed range scan over the geohash field, `start <= geohash <= end`
    pub async fn find_in_geohash_range(&self, start: &str, end: &str) -> RepoResult<Vec<Restaurant>> {
        let restaurants: Vec<Restaurant> = self
            .base
            .db()
            .query("SELECT * FROM restaurant WHERE geohash >= $start AND geohash <= $end")
            .bind(("start", start.to_string()))
            .bind(("end", end.to_string()))
            .await?
            .take(0)?;
        Ok(restaurants)
    }

    /// Create a new restaurant; geohash is computed here, never taken from the client
    pub async fn create(&self, data: RestaurantCreate) -> RepoResult<Restaurant> {
        let geohash = self.geohash_for(data.latitude, data.longitude)?;
        let created: Vec<Restaurant> = self
            .base
            .db()
            .query(
                "CREATE restaurant SET \
                 owner_id = $owner_id, name = $name, \
                 latitude = $latitude, longitude = $longitude, geohash = $geohash, \
                 address = $address, price_range = $price_range, \
                 open_time = $open_time, close_time = $close_time, \
                 rating = $rating, description = $description, image_url = $image_url, \
                 created_at = time::now()",
            )
            .bind(("owner_id", data.owner_id))
            .bind(("name", data.name))
            .bind(("latitude", data.latitude))
            .bind(("longitude", data.longitude))
            .bind(("geohash", geohash))
            .bind(("address", data.address))
            .bind(("price_range", data.price_range))
            .bind(("open_time", data.open_time))
            .bind(("close_time", data.close_time))
            .bind(("rating", data.rating))
            .bind(("description", data.description))
            .bind(("image_url", data.image_url))
            .await?
            .take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    /// Update a restaurant; recomputes geohash in the same statement when
    /// either coordinate changes
    pub async fn update(&self, id: &str, data: RestaurantUpdate) -> RepoResult<Restaurant> {
        let thing = parse_record_id(id, TABLE)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))?;

        // 手动合并，坐标从合并后的值重算 geohash
        let latitude = data.latitude.unwrap_or(existing.latitude);
        let longitude = data.longitude.unwrap_or(existing.longitude);
        let geohash = self.geohash_for(latitude, longitude)?;

        let updated: Vec<Restaurant> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET \
                 name = $name, latitude = $latitude, longitude = $longitude, geohash = $geohash, \
                 address = $address, price_range = $price_range, \
                 open_time = $open_time, close_time = $close_time, \
                 rating = $rating, description = $description, image_url = $image_url",
            )
            .bind(("thing", thing))
            .bind(("name", data.name.unwrap_or(existing.name)))
            .bind(("latitude", latitude))
            .bind(("longitude", longitude))
            .bind(("geohash", geohash))
            .bind(("address", data.address.unwrap_or(existing.address)))
            .bind(("price_range", data.price_range.unwrap_or(existing.price_range)))
            .bind(("open_time", data.open_time.unwrap_or(existing.open_time)))
            .bind(("close_time", data.close_time.unwrap_or(existing.close_time)))
            .bind(("rating", data.rating.unwrap_or(existing.rating)))
            .bind(("description", data.description.unwrap_or(existing.description)))
            .bind(("image_url", data.image_url.unwrap_or(existing.image_url)))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }
}
