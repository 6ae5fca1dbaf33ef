//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and the Web Mercator tile coordinates used by slippy-map tile services.

mod types;

pub use types::{
    CoordError, LatLonBounds, SeedPoint, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, strictly between the Mercator
///   singularities (±85.05112878); the poles have no tile
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 18)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    // Validate inputs. The latitude check is strict: the bound itself
    // projects onto row 2^zoom, one past the last tile.
    if !(lat > MIN_LAT && lat < MAX_LAT) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    // Calculate number of tiles at this zoom level
    let n = 2.0_f64.powi(zoom as i32);
    let max_index = (1u32 << zoom) - 1;

    // Convert longitude to tile X coordinate. The east edge (lon == 180)
    // lands on column 2^zoom and belongs to the last column.
    let x = (((lon + 180.0) / 360.0 * n) as u32).min(max_index);

    // Convert latitude to tile Y coordinate using Web Mercator projection
    let lat_rad = lat * PI / 180.0;
    let y = (((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32).min(max_index);

    Ok(TileCoord { zoom, x, y })
}

/// Geographic bounding box of a tile.
///
/// Evaluates the inverse Web Mercator transform at the tile's northwest
/// and southeast corners. Rows count from the north, so `y + 1` is the
/// southern edge and supplies `min_lat`.
#[inline]
pub fn tile_bounds(tile: &TileCoord) -> LatLonBounds {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let min_lon = tile.x as f64 / n * 360.0 - 180.0;
    let max_lon = (tile.x + 1) as f64 / n * 360.0 - 180.0;

    let max_lat = row_edge_lat(tile.y as f64, n);
    let min_lat = row_edge_lat((tile.y + 1) as f64, n);

    LatLonBounds {
        min_lon,
        min_lat,
        max_lon,
        max_lat,
    }
}

/// Latitude of a horizontal tile edge via inverse Web Mercator.
fn row_edge_lat(y: f64, n: f64) -> f64 {
    let lat_rad = (PI * (1.0 - 2.0 * y / n)).sinh().atan();
    lat_rad * 180.0 / PI
}

impl SeedPoint {
    /// The tile containing this seed at its own zoom level.
    #[inline]
    pub fn to_tile(&self) -> Result<TileCoord, CoordError> {
        to_tile_coords(self.lat, self.lon, self.zoom)
    }
}
