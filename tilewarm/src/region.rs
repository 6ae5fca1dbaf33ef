//! Region-of-interest filtering
//!
//! Restricts a tile frontier to tiles whose geographic bounding box
//! intersects a polygon. With no region configured every tile passes,
//! so the filter is always safe to apply.

use std::path::Path;

use thiserror::Error;

use crate::coord::{tile_bounds, LatLonBounds, TileCoord};

/// Errors raised while building a region of interest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    /// A polygon needs at least three vertices
    #[error("region polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// The region file could not be read
    #[error("failed to read region file '{path}': {reason}")]
    Unreadable { path: String, reason: String },
    /// The region file did not contain a JSON array of [lon, lat] pairs
    #[error("region file '{path}' is not a JSON array of [lon, lat] pairs: {reason}")]
    Malformed { path: String, reason: String },
}

/// A polygon over geographic coordinates.
///
/// Stored as an ordered ring of `(lon, lat)` vertices; the closing edge
/// back to the first vertex is implicit. The ring may wind either way.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionOfInterest {
    ring: Vec<(f64, f64)>,
}

impl RegionOfInterest {
    pub fn new(ring: Vec<(f64, f64)>) -> Result<Self, RegionError> {
        if ring.len() < 3 {
            return Err(RegionError::TooFewVertices(ring.len()));
        }
        Ok(RegionOfInterest { ring })
    }

    /// Loads a polygon from a JSON file holding an array of `[lon, lat]`
    /// pairs, e.g. `[[13.0, 52.3], [13.8, 52.3], [13.4, 52.7]]`.
    pub fn from_json_file(path: &Path) -> Result<Self, RegionError> {
        let text = std::fs::read_to_string(path).map_err(|e| RegionError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let pairs: Vec<[f64; 2]> =
            serde_json::from_str(&text).map_err(|e| RegionError::Malformed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::new(pairs.into_iter().map(|[lon, lat]| (lon, lat)).collect())
    }

    pub fn vertex_count(&self) -> usize {
        self.ring.len()
    }

    /// True if the polygon and the bounding box share any area or edge.
    ///
    /// Three cases cover every overlap: a ring vertex inside the box, a
    /// box corner inside the polygon (box fully within the region), or
    /// a ring edge crossing a box edge (overlap with no contained
    /// vertices on either side).
    pub fn intersects(&self, bounds: &LatLonBounds) -> bool {
        if self
            .ring
            .iter()
            .any(|&(lon, lat)| bounds.contains(lon, lat))
        {
            return true;
        }

        let corners = [
            (bounds.min_lon, bounds.min_lat),
            (bounds.max_lon, bounds.min_lat),
            (bounds.max_lon, bounds.max_lat),
            (bounds.min_lon, bounds.max_lat),
        ];
        if corners
            .iter()
            .any(|&(lon, lat)| self.contains_point(lon, lat))
        {
            return true;
        }

        let box_edges = [
            (corners[0], corners[1]),
            (corners[1], corners[2]),
            (corners[2], corners[3]),
            (corners[3], corners[0]),
        ];
        let n = self.ring.len();
        (0..n).any(|i| {
            let edge = (self.ring[i], self.ring[(i + 1) % n]);
            box_edges
                .iter()
                .any(|&(c, d)| segments_intersect(edge.0, edge.1, c, d))
        })
    }

    /// Even-odd ray casting. Points exactly on the boundary may resolve
    /// either way; `intersects` covers those through its other cases.
    fn contains_point(&self, lon: f64, lat: f64) -> bool {
        let n = self.ring.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.ring[i];
            let (xj, yj) = self.ring[j];
            if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Signed area orientation of the triangle (p, q, r).
fn orientation(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> f64 {
    (q.0 - p.0) * (r.1 - p.1) - (q.1 - p.1) * (r.0 - p.0)
}

/// True if q lies within the axis-aligned box spanned by p and r.
fn on_segment(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> bool {
    q.0 >= p.0.min(r.0) && q.0 <= p.0.max(r.0) && q.1 >= p.1.min(r.1) && q.1 <= p.1.max(r.1)
}

/// Segment intersection including collinear and endpoint touches.
fn segments_intersect(a: (f64, f64), b: (f64, f64), c: (f64, f64), d: (f64, f64)) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(c, a, d))
        || (d2 == 0.0 && on_segment(c, b, d))
        || (d3 == 0.0 && on_segment(a, c, b))
        || (d4 == 0.0 && on_segment(a, d, b))
}

/// Tile predicate applied between expansion and cache probing.
#[derive(Debug, Clone, Default)]
pub struct RegionFilter {
    region: Option<RegionOfInterest>,
}

impl RegionFilter {
    /// A filter that accepts every tile.
    pub fn unrestricted() -> Self {
        RegionFilter { region: None }
    }

    /// A filter that accepts tiles intersecting the given polygon.
    pub fn within(region: RegionOfInterest) -> Self {
        RegionFilter {
            region: Some(region),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.region.is_none()
    }

    /// True if the tile's bounding box intersects the region, or no
    /// region is configured.
    pub fn accepts(&self, tile: &TileCoord) -> bool {
        match &self.region {
            None => true,
            Some(region) => region.intersects(&tile_bounds(tile)),
        }
    }
}
