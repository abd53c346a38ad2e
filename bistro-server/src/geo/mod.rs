//! 地理计算模块 - 纯函数，无 I/O
//!
//! # 结构
//!
//! - [`geohash`] - Geohash 编解码 (base-32 交错位)
//! - [`distance`] - Haversine 大圆距离
//! - [`bounds`] - 半径搜索的 geohash 范围规划

pub mod bounds;
pub mod distance;
pub mod geohash;

pub use bounds::{GeohashRange, plan_ranges};
pub use distance::{DISTANCE_EPSILON_KM, haversine_km};
pub use geohash::{decode, encode, neighbors};

use thiserror::Error;

/// Geo computation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Invalid geohash precision: {0} (expected 1..=12)")]
    InvalidPrecision(usize),

    #[error("Invalid geohash: {0}")]
    InvalidHash(String),
}

/// Result type for geo operations
pub type GeoResult<T> = Result<T, GeoError>;

/// Validate a latitude/longitude pair
pub fn validate_coordinate(lat: f64, lng: f64) -> GeoResult<()> {
    if !lat.is_finite() || !lng.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(GeoError::InvalidCoordinate { lat, lng });
    }
    Ok(())
}
