//! Proximity Search
//!
//! 半径搜索 = 范围规划 + 索引范围扫描 + 真实距离后置过滤。
//! geohash 范围是召回保证 (只多不漏)，精确性靠 haversine 复核。
//!
//! 只读且幂等：任何一段范围扫描失败即整个调用失败，不返回部分
//! 结果，也不在内部重试。搜索日志先写后查，写失败只记日志。

use crate::db::models::{Restaurant, RestaurantWithDistance};
use crate::db::repository::{RestaurantRepository, SearchLogRepository};
use crate::geo::{self, DISTANCE_EPSILON_KM, haversine_km};
use crate::utils::{AppError, AppResult};
use std::collections::HashSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Nearby search request
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// None → service default (2 km)
    pub radius_km: Option<f64>,
    /// None → service cap
    pub limit: Option<usize>,
    /// Audit trail attribution, defaults to "anon"
    pub user_id: Option<String>,
}

#[derive(Clone)]
pub struct ProximitySearchService {
    restaurants: RestaurantRepository,
    logs: SearchLogRepository,
    /// Geohash length of the stored index field
    precision: usize,
    default_radius_km: f64,
    max_results: usize,
}

impl ProximitySearchService {
    pub fn new(
        db: Surreal<Db>,
        precision: usize,
        default_radius_km: f64,
        max_results: usize,
    ) -> Self {
        Self {
            restaurants: RestaurantRepository::new(db.clone(), precision),
            logs: SearchLogRepository::new(db),
            precision,
            default_radius_km,
            max_results,
        }
    }

    /// Find restaurants within the radius, nearest first.
    pub async fn find_nearby(&self, query: NearbyQuery) -> AppResult<Vec<RestaurantWithDistance>> {
        geo::validate_coordinate(query.latitude, query.longitude)
            .map_err(|e| AppError::validation(e.to_string()))?;

        let radius_km = query.radius_km.unwrap_or(self.default_radius_km).max(0.0);
        let limit = query
            .limit
            .unwrap_or(self.max_results)
            .min(self.max_results);
        let user_id = query.user_id.as_deref().unwrap_or("anon");

        // 审计日志尽力而为，绝不影响搜索本身
        if let Err(e) = self
            .logs
            .log(user_id, query.latitude, query.longitude, radius_km)
            .await
        {
            tracing::warn!(error = %e, "Failed to write search log");
        }

        let ranges = geo::plan_ranges(
            query.latitude,
            query.longitude,
            radius_km * 1000.0,
            self.precision,
        )
        .map_err(|e| AppError::validation(e.to_string()))?;

        // 各范围独立扫描，任一失败即整体失败
        let scans = ranges
            .iter()
            .map(|range| self.restaurants.find_in_geohash_range(&range.start, &range.end));
        let batches = futures::future::try_join_all(scans)
            .await
            .map_err(|e| AppError::unavailable(e.to_string()))?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<Restaurant> = Vec::new();
        for batch in batches {
            for restaurant in batch {
                let Some(id) = restaurant.id.as_ref().map(|id| id.to_string()) else {
                    continue;
                };
                if seen.insert(id) {
                    candidates.push(restaurant);
                }
            }
        }

        let mut results: Vec<RestaurantWithDistance> = candidates
            .into_iter()
            .filter(|r| r.latitude.is_finite() && r.longitude.is_finite())
            .map(|r| {
                let distance_km =
                    haversine_km(query.latitude, query.longitude, r.latitude, r.longitude);
                RestaurantWithDistance {
                    restaurant: r,
                    distance_km,
                }
            })
            .filter(|r| r.distance_km <= radius_km + DISTANCE_EPSILON_KM)
            .collect();

        results.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        tracing::debug!(
            lat = query.latitude,
            lng = query.longitude,
            radius_km,
            ranges = ranges.len(),
            hits = results.len(),
            "Nearby search completed"
        );
        Ok(results)
    }
}
