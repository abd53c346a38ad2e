//! Bounding Range Planner
//!
//! Turns (center, radius) into a small set of lexicographic geohash
//! ranges whose union covers the whole disk. The union over-approximates
//! the disk; callers must post-filter by true distance. This mirrors the
//! query-bounds contract of the geofire family: one indexed range scan
//! per bound, `start <= geohash <= end` inclusive.

use super::geohash::{self, MAX_PRECISION};
use super::{GeoResult, validate_coordinate};

/// One inclusive lexicographic range of geohash strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeohashRange {
    pub start: String,
    pub end: String,
}

/// Meters per degree of latitude (spherical mean)
const METERS_PER_DEGREE_LAT: f64 = 110_574.0;
/// Meters per degree of longitude at the equator
const METERS_PER_DEGREE_LNG: f64 = 111_320.0;

/// Pick the longest precision whose cell still covers `radius_m` in both
/// axes at the given latitude. A disk of radius <= cell extent is always
/// contained in the center cell plus its 8 neighbors.
fn precision_for_radius(lat: f64, radius_m: f64, max_precision: usize) -> usize {
    let max_precision = max_precision.clamp(1, MAX_PRECISION);
    let cos_lat = lat.to_radians().cos().max(1e-6);
    for precision in (1..=max_precision).rev() {
        // cell_size 只对合法精度报错，此处范围已夹紧
        let (lat_deg, lng_deg) = geohash::cell_size(precision).expect("precision in range");
        let lat_extent_m = lat_deg * METERS_PER_DEGREE_LAT;
        let lng_extent_m = lng_deg * METERS_PER_DEGREE_LNG * cos_lat;
        if lat_extent_m >= radius_m && lng_extent_m >= radius_m {
            return precision;
        }
    }
    1
}

/// Plan the geohash ranges covering a disk of `radius_m` meters around
/// `(lat, lng)`. `max_precision` caps the cell length at the precision the
/// storage index uses; longer prefixes would sort past the stored hashes.
///
/// Guarantees recall, not precision: every point within the radius falls
/// inside some emitted range, plus surrounding slack. At most 9 cells are
/// produced before coalescing.
pub fn plan_ranges(lat: f64, lng: f64, radius_m: f64, max_precision: usize) -> GeoResult<Vec<GeohashRange>> {
    validate_coordinate(lat, lng)?;
    let radius_m = radius_m.max(0.0);

    let precision = precision_for_radius(lat, radius_m, max_precision);
    let center = geohash::encode(lat, lng, precision)?;
    let ring = geohash::neighbors(&center)?;

    let mut cells: Vec<String> = Vec::with_capacity(9);
    cells.push(center);
    cells.extend(ring);
    cells.sort();
    cells.dedup();

    // Coalesce lexicographically adjacent cells into one scan range.
    // Cells all share a length, so adjacency is a base-32 increment.
    let mut runs: Vec<(String, String)> = Vec::new();
    for cell in cells {
        match runs.last_mut() {
            Some((_, end)) if geohash::successor(end).as_deref() == Some(cell.as_str()) => {
                *end = cell;
            }
            _ => runs.push((cell.clone(), cell)),
        }
    }

    Ok(runs
        .into_iter()
        .map(|(start, end)| GeohashRange {
            start,
            // '~' sorts above the whole base-32 alphabet: [h, h~] spans
            // every stored hash with prefix h
            end: format!("{end}~"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoError, haversine_km};
    use rand::Rng;

    fn covered(ranges: &[GeohashRange], hash: &str) -> bool {
        ranges
            .iter()
            .any(|r| r.start.as_str() <= hash && hash <= r.end.as_str())
    }

    #[test]
    fn ranges_sorted_and_disjoint() {
        let ranges = plan_ranges(14.8859, 102.1428, 2000.0, 10).unwrap();
        assert!(!ranges.is_empty() && ranges.len() <= 9);
        for pair in ranges.windows(2) {
            assert!(pair[0].end < pair[1].start, "{pair:?} overlap");
        }
        for r in &ranges {
            assert!(r.start < r.end);
        }
    }

    #[test]
    fn covers_points_inside_radius() {
        // Recall property: any point within the radius hashes into some range
        let mut rng = rand::thread_rng();
        let centers = [(14.8859, 102.1428), (51.5074, -0.1278), (-33.8688, 151.2093)];
        for (clat, clng) in centers {
            for radius_m in [200.0, 2_000.0, 20_000.0] {
                let ranges = plan_ranges(clat, clng, radius_m, 10).unwrap();
                for _ in 0..200 {
                    // Uniform offsets within the radius disk (approximate)
                    let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
                    let dist: f64 = rng.gen_range(0.0..radius_m);
                    let dlat = (dist * angle.cos()) / 110_574.0;
                    let dlng =
                        (dist * angle.sin()) / (111_320.0 * clat.to_radians().cos().max(1e-6));
                    let plat = (clat + dlat).clamp(-90.0, 90.0);
                    let plng = clng + dlng;
                    assert!(
                        haversine_km(clat, clng, plat, plng) <= radius_m / 1000.0 + 0.01,
                        "sample fell outside the disk"
                    );
                    let hash = crate::geo::encode(plat, plng, 10).unwrap();
                    assert!(
                        covered(&ranges, &hash),
                        "point ({plat},{plng}) hash {hash} not covered for r={radius_m}"
                    );
                }
            }
        }
    }

    #[test]
    fn zero_radius_emits_center_cell() {
        let ranges = plan_ranges(14.8859, 102.1428, 0.0, 10).unwrap();
        assert!(!ranges.is_empty());
        let hash = crate::geo::encode(14.8859, 102.1428, 10).unwrap();
        assert!(covered(&ranges, &hash));
    }

    #[test]
    fn wider_radius_uses_shorter_cells() {
        let narrow = plan_ranges(14.8859, 102.1428, 100.0, 10).unwrap();
        let wide = plan_ranges(14.8859, 102.1428, 50_000.0, 10).unwrap();
        // end strings include the '~' sentinel, subtract it for cell length
        assert!(narrow[0].start.len() > wide[0].start.len());
    }

    #[test]
    fn precision_capped_by_storage_index() {
        let ranges = plan_ranges(14.8859, 102.1428, 0.0, 6).unwrap();
        for r in &ranges {
            assert!(r.start.len() <= 6);
        }
    }

    #[test]
    fn rejects_invalid_center() {
        assert!(matches!(
            plan_ranges(95.0, 0.0, 1000.0, 10),
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn near_pole_still_plans() {
        let ranges = plan_ranges(89.5, 10.0, 5_000.0, 10).unwrap();
        assert!(!ranges.is_empty());
    }
}
