//! Search Log Repository
//!
//! Write-only audit trail for nearby searches.

use super::{BaseRepository, RepoResult};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct SearchLogRepository {
    base: BaseRepository,
}

impl SearchLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one audit record
    pub async fn log(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "CREATE search_log SET user_id = $user_id, latitude = $latitude, \
                 longitude = $longitude, radius_km = $radius_km, created_at = time::now()",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("latitude", latitude))
            .bind(("longitude", longitude))
            .bind(("radius_km", radius_km))
            .await?
            .check()?;
        Ok(())
    }
}
