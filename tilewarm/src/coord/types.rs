//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Web Mercator latitude singularities. Valid latitudes lie strictly
/// between these bounds; the bounds themselves project onto row 2^zoom.
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Deepest zoom level of the tile scheme
pub const MAX_ZOOM: u8 = 18;

/// Tile coordinates in the Web Mercator / Slippy Map system.
///
/// `x` counts columns from the west edge, `y` counts rows from the
/// north edge; both are less than `2^zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    /// Zoom level (0-18)
    pub zoom: u8,
    /// X coordinate (east-west), 0 at west
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
}

impl TileCoord {
    /// The four child tiles one zoom level deeper.
    ///
    /// Callers keep `zoom` below [`MAX_ZOOM`] before subdividing.
    #[inline]
    pub fn children(&self) -> [TileCoord; 4] {
        let zoom = self.zoom + 1;
        let x = self.x * 2;
        let y = self.y * 2;
        [
            TileCoord { zoom, x, y },
            TileCoord { zoom, x: x + 1, y },
            TileCoord { zoom, x, y: y + 1 },
            TileCoord { zoom, x: x + 1, y: y + 1 },
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Geographic bounding box of a tile, in degrees.
///
/// West/south edges are the minimums; `min < max` holds on both axes
/// in every hemisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl LatLonBounds {
    /// Returns true if the point lies inside the box or on its edge.
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Center point as `(lon, lat)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

/// A geographic position plus the zoom level expansion starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPoint {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
}

impl SeedPoint {
    pub fn new(lat: f64, lon: f64, zoom: u8) -> Self {
        SeedPoint { lat, lon, zoom }
    }
}

impl fmt::Display for SeedPoint {
    /// Round-trips through [`SeedPoint::from_str`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.lat, self.lon, self.zoom)
    }
}

impl FromStr for SeedPoint {
    type Err = CoordError;

    /// Parses `lat,lon,zoom`, e.g. `37.7749,-122.4194,7`.
    ///
    /// Syntactic only; range checks happen when the seed is converted
    /// to a tile.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(CoordError::InvalidSeed(s.to_string()));
        }
        let lat = parts[0]
            .parse()
            .map_err(|_| CoordError::InvalidSeed(s.to_string()))?;
        let lon = parts[1]
            .parse()
            .map_err(|_| CoordError::InvalidSeed(s.to_string()))?;
        let zoom = parts[2]
            .parse()
            .map_err(|_| CoordError::InvalidSeed(s.to_string()))?;
        Ok(SeedPoint { lat, lon, zoom })
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is at or beyond the Web Mercator singularity
    #[error("invalid latitude: {0} (must be strictly between -85.05112878 and 85.05112878)")]
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    #[error("invalid longitude: {0} (must be between -180.0 and 180.0)")]
    InvalidLongitude(f64),
    /// Zoom level is beyond the tile scheme
    #[error("invalid zoom level: {0} (must be at most 18)")]
    InvalidZoom(u8),
    /// Seed string was not a lat,lon,zoom triple
    #[error("invalid seed point: '{0}' (expected lat,lon,zoom)")]
    InvalidSeed(String),
}
