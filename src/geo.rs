//! Coordinate math: great-circle distance and the participant centroid.
//!
//! All angles are degrees on the public surface; radians only appear inside
//! the haversine formula.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

const DEG: f64 = PI / 180.0;

/// Mean Earth radius used by the distance formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_coords(self.lat, self.lon))
    }
}

/// Parses `"37.4979,127.0276"` (whitespace around either part is allowed).
impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected 'lat,lon', got '{}'", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("Invalid latitude '{}': {}", lat.trim(), e))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|e| format!("Invalid longitude '{}': {}", lon.trim(), e))?;

        let coord = Coordinate::new(lat, lon);
        if !coord.is_valid() {
            return Err("Invalid coordinates. Lat: -90..90, Lon: -180..180".into());
        }
        Ok(coord)
    }
}

/// Great-circle distance in kilometers (haversine, R = 6371 km).
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat * DEG;
    let lat2 = b.lat * DEG;
    let dlat = (b.lat - a.lat) * DEG;
    let dlon = (b.lon - a.lon) * DEG;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sum of distances from `from` to every point in `to`.
pub fn total_distance_km(from: Coordinate, to: &[Coordinate]) -> f64 {
    to.iter().map(|p| haversine_km(from, *p)).sum()
}

/// Arithmetic mean of latitudes and longitudes, summed in input order.
///
/// This is a naive centroid, not a geodesic midpoint: it ignores curvature
/// and is pulled by outliers. Fine at city scale.
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.lat, lon + p.lon));
    Some(Coordinate::new(lat_sum / n, lon_sum / n))
}

/// Format coordinates as e.g. "37.4979°N, 127.0276°E".
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}
