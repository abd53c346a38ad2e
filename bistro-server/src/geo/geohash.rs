//! Geohash Codec
//!
//! Base-32 interleaved-bit encoding of (latitude, longitude) pairs.
//! Shared prefixes imply spatial proximity; longer hashes denote smaller
//! cells. Even bits refine longitude, odd bits latitude, matching the
//! de-facto geohash convention so stored hashes sort the same way as
//! every other implementation.

use super::{GeoError, GeoResult, validate_coordinate};

/// Geohash base-32 alphabet (no a/i/l/o)
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Maximum supported precision (12 chars ≈ 3.7cm cell)
pub const MAX_PRECISION: usize = 12;

fn base32_index(c: u8) -> Option<u32> {
    BASE32.iter().position(|&b| b == c).map(|i| i as u32)
}

/// Encode a point into a geohash of the given precision (1..=12)
pub fn encode(lat: f64, lng: f64, precision: usize) -> GeoResult<String> {
    validate_coordinate(lat, lng)?;
    if precision == 0 || precision > MAX_PRECISION {
        return Err(GeoError::InvalidPrecision(precision));
    }

    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lng_range = (-180.0_f64, 180.0_f64);
    let mut hash = String::with_capacity(precision);
    let mut ch: u32 = 0;
    let mut bit = 0;
    let mut even = true; // 偶数位 = 经度

    while hash.len() < precision {
        let (range, value) = if even {
            (&mut lng_range, lng)
        } else {
            (&mut lat_range, lat)
        };
        let mid = (range.0 + range.1) / 2.0;
        ch <<= 1;
        if value >= mid {
            ch |= 1;
            range.0 = mid;
        } else {
            range.1 = mid;
        }
        even = !even;
        bit += 1;
        if bit == 5 {
            hash.push(BASE32[ch as usize] as char);
            ch = 0;
            bit = 0;
        }
    }
    Ok(hash)
}

/// Decode a geohash to the center point of its cell
pub fn decode(hash: &str) -> GeoResult<(f64, f64)> {
    let ((min_lat, max_lat), (min_lng, max_lng)) = decode_bounds(hash)?;
    Ok(((min_lat + max_lat) / 2.0, (min_lng + max_lng) / 2.0))
}

/// Decode a geohash to its cell bounds: ((min_lat, max_lat), (min_lng, max_lng))
pub fn decode_bounds(hash: &str) -> GeoResult<((f64, f64), (f64, f64))> {
    if hash.is_empty() || hash.len() > MAX_PRECISION {
        return Err(GeoError::InvalidHash(hash.to_string()));
    }

    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lng_range = (-180.0_f64, 180.0_f64);
    let mut even = true;

    for c in hash.bytes() {
        let idx =
            base32_index(c.to_ascii_lowercase()).ok_or_else(|| GeoError::InvalidHash(hash.to_string()))?;
        for shift in (0..5).rev() {
            let bit = (idx >> shift) & 1;
            let range = if even { &mut lng_range } else { &mut lat_range };
            let mid = (range.0 + range.1) / 2.0;
            if bit == 1 {
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            even = !even;
        }
    }
    Ok((lat_range, lng_range))
}

/// Cell extent in degrees at a precision: (lat_deg, lng_deg)
pub fn cell_size(precision: usize) -> GeoResult<(f64, f64)> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(GeoError::InvalidPrecision(precision));
    }
    let total_bits = precision as u32 * 5;
    let lng_bits = total_bits.div_ceil(2);
    let lat_bits = total_bits / 2;
    Ok((180.0 / f64::powi(2.0, lat_bits as i32), 360.0 / f64::powi(2.0, lng_bits as i32)))
}

/// The 8 cells adjacent to a geohash, at the same precision.
///
/// 经度跨反子午线回绕；纬度在极点处收缩 (极点邻居退化为中心单元，
/// 保证覆盖集合不缺格)。
pub fn neighbors(hash: &str) -> GeoResult<[String; 8]> {
    let precision = hash.len();
    let (lat, lng) = decode(hash)?;
    let (lat_sz, lng_sz) = cell_size(precision)?;

    const OFFSETS: [(f64, f64); 8] = [
        (1.0, -1.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, -1.0),
        (0.0, 1.0),
        (-1.0, -1.0),
        (-1.0, 0.0),
        (-1.0, 1.0),
    ];

    let mut out: [String; 8] = Default::default();
    for (slot, (dlat, dlng)) in out.iter_mut().zip(OFFSETS) {
        let mut nlat = lat + dlat * lat_sz;
        if !(-90.0..=90.0).contains(&nlat) {
            // Polar clamp: degenerate to the center row
            nlat = lat;
        }
        // Wrap longitude across the antimeridian
        let mut nlng = lng + dlng * lng_sz;
        if nlng > 180.0 {
            nlng -= 360.0;
        } else if nlng < -180.0 {
            nlng += 360.0;
        }
        *slot = encode(nlat, nlng, precision)?;
    }
    Ok(out)
}

/// Lexicographic successor of a geohash within its length (base-32
/// increment with carry). `None` when the hash is the last cell ("zzz…").
pub fn successor(hash: &str) -> Option<String> {
    let mut bytes: Vec<u8> = hash.bytes().collect();
    for i in (0..bytes.len()).rev() {
        let idx = base32_index(bytes[i])?;
        if idx < 31 {
            bytes[i] = BASE32[(idx + 1) as usize];
            return Some(String::from_utf8(bytes).ok()?);
        }
        bytes[i] = BASE32[0];
    }
    None
}
