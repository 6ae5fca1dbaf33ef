//! Tile pyramid expansion
//!
//! Expands seed tiles into the complete set of descendant tiles down to
//! a maximum zoom level. Expansion is a breadth-first quad-split: each
//! tile popped from the work queue contributes its four children at the
//! next zoom level, and a visited set keyed by the tile value keeps
//! every tile exactly once however much the seed pyramids overlap.

use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use crate::coord::{TileCoord, MAX_ZOOM};

/// Errors raised while validating seeds before expansion.
///
/// All of these are fatal and reported before any fetching starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpansionError {
    /// Seed tile's x or y does not exist at its own zoom level
    #[error("seed tile {0} has coordinates outside its zoom level")]
    SeedOutOfRange(TileCoord),
    /// Seed tile is already deeper than the requested maximum
    #[error("seed tile {tile} is deeper than the maximum zoom {max_zoom}")]
    SeedBeyondMaxZoom { tile: TileCoord, max_zoom: u8 },
    /// Requested maximum zoom is beyond the tile scheme
    #[error("maximum zoom {0} exceeds the tile scheme limit of 18")]
    MaxZoomTooDeep(u8),
}

/// Expands seed tiles into every descendant tile up to `max_zoom`.
///
/// The result contains the seeds themselves plus all tiles reachable by
/// recursive quad-splitting, each exactly once. Order is not meaningful;
/// callers that need determinism sort the set themselves.
pub fn expand(seeds: &[TileCoord], max_zoom: u8) -> Result<HashSet<TileCoord>, ExpansionError> {
    if max_zoom > MAX_ZOOM {
        return Err(ExpansionError::MaxZoomTooDeep(max_zoom));
    }
    for seed in seeds {
        if seed.zoom > max_zoom {
            return Err(ExpansionError::SeedBeyondMaxZoom {
                tile: *seed,
                max_zoom,
            });
        }
        let extent = 1u32 << seed.zoom;
        if seed.x >= extent || seed.y >= extent {
            return Err(ExpansionError::SeedOutOfRange(*seed));
        }
    }

    let mut frontier: HashSet<TileCoord> = HashSet::new();
    let mut queue: VecDeque<TileCoord> = VecDeque::new();

    for seed in seeds {
        if frontier.insert(*seed) {
            queue.push_back(*seed);
        }
    }

    // Single-level splits only. The insert-on-enqueue check is what
    // keeps overlapping pyramids from re-expanding shared subtrees.
    while let Some(tile) = queue.pop_front() {
        if tile.zoom >= max_zoom {
            continue;
        }
        for child in tile.children() {
            if frontier.insert(child) {
                queue.push_back(child);
            }
        }
    }

    Ok(frontier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(zoom: u8, x: u32, y: u32) -> TileCoord {
        TileCoord { zoom, x, y }
    }

    #[test]
    fn test_single_seed_two_levels_down() {
        // 1 seed + 4 children + 16 grandchildren
        let frontier = expand(&[tile(7, 20, 49)], 9).unwrap();

        assert_eq!(frontier.len(), 21);
        assert_eq!(frontier.iter().filter(|t| t.zoom == 7).count(), 1);
        assert_eq!(frontier.iter().filter(|t| t.zoom == 8).count(), 4);
        assert_eq!(frontier.iter().filter(|t| t.zoom == 9).count(), 16);
    }

    #[test]
    fn test_seed_at_max_zoom_is_returned_alone() {
        let seed = tile(9, 100, 200);
        let frontier = expand(&[seed], 9).unwrap();

        assert_eq!(frontier.len(), 1);
        assert!(frontier.contains(&seed));
    }

    #[test]
    fn test_duplicate_seeds_collapse() {
        let seed = tile(5, 10, 11);
        let once = expand(&[seed], 7).unwrap();
        let twice = expand(&[seed, seed], 7).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_seed_inside_another_pyramid_adds_nothing() {
        // (8,40,98) is a child of (7,20,49), so its subtree is shared
        let parent_only = expand(&[tile(7, 20, 49)], 9).unwrap();
        let with_child = expand(&[tile(7, 20, 49), tile(8, 40, 98)], 9).unwrap();

        assert_eq!(parent_only, with_child);
        assert_eq!(with_child.len(), 21);
    }

    #[test]
    fn test_disjoint_seeds_union() {
        let frontier = expand(&[tile(7, 20, 49), tile(7, 21, 49)], 8).unwrap();

        // Two disjoint pyramids of 5 tiles each
        assert_eq!(frontier.len(), 10);
    }

    #[test]
    fn test_empty_seed_list_expands_to_nothing() {
        let frontier = expand(&[], 10).unwrap();
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_seed_deeper_than_max_zoom_is_rejected() {
        let result = expand(&[tile(10, 0, 0)], 9);
        assert_eq!(
            result,
            Err(ExpansionError::SeedBeyondMaxZoom {
                tile: tile(10, 0, 0),
                max_zoom: 9
            })
        );
    }

    #[test]
    fn test_seed_coordinates_must_fit_the_zoom_level() {
        // Zoom 7 has 128 columns; x == 128 does not exist
        let result = expand(&[tile(7, 128, 0)], 9);
        assert_eq!(result, Err(ExpansionError::SeedOutOfRange(tile(7, 128, 0))));
    }

    #[test]
    fn test_max_zoom_beyond_scheme_is_rejected() {
        let result = expand(&[tile(0, 0, 0)], 19);
        assert_eq!(result, Err(ExpansionError::MaxZoomTooDeep(19)));
    }

    #[test]
    fn test_validation_runs_before_any_expansion() {
        // One good seed and one bad seed: the whole call fails
        let result = expand(&[tile(3, 1, 1), tile(4, 16, 0)], 6);
        assert!(result.is_err());
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn seeds_from(raw: &[(u8, u32, u32)]) -> Vec<TileCoord> {
            raw.iter()
                .map(|&(zoom, xr, yr)| {
                    let extent = 1u32 << zoom;
                    TileCoord {
                        zoom,
                        x: xr % extent,
                        y: yr % extent,
                    }
                })
                .collect()
        }

        proptest! {
            #[test]
            fn test_expansion_is_idempotent(
                raw in prop::collection::vec((0u8..=5, 0u32..65536, 0u32..65536), 1..4),
                max_zoom in 5u8..=8
            ) {
                let seeds = seeds_from(&raw);

                let first = expand(&seeds, max_zoom)?;
                let second = expand(&seeds, max_zoom)?;

                prop_assert_eq!(first, second);
            }

            #[test]
            fn test_deeper_expansion_extends_the_shallow_one(
                raw in prop::collection::vec((0u8..=5, 0u32..65536, 0u32..65536), 1..4),
                max_zoom in 5u8..=7
            ) {
                let seeds = seeds_from(&raw);

                let shallow = expand(&seeds, max_zoom)?;
                let deep = expand(&seeds, max_zoom + 1)?;

                // The deep frontier cut off at the shallow depth is the
                // shallow frontier exactly; extra depth only appends
                let deep_restricted: HashSet<TileCoord> = deep
                    .iter()
                    .filter(|t| t.zoom <= max_zoom)
                    .copied()
                    .collect();
                prop_assert_eq!(deep_restricted, shallow);
            }

            #[test]
            fn test_single_seed_count_is_the_geometric_sum(
                zoom in 0u8..=4,
                xr in 0u32..65536,
                yr in 0u32..65536,
                extra_levels in 0u8..=4
            ) {
                let extent = 1u32 << zoom;
                let seed = TileCoord { zoom, x: xr % extent, y: yr % extent };
                let max_zoom = zoom + extra_levels;

                let frontier = expand(&[seed], max_zoom)?;

                // 1 + 4 + 16 + ... = (4^(levels+1) - 1) / 3
                let expected = (4u64.pow(extra_levels as u32 + 1) - 1) / 3;
                prop_assert_eq!(frontier.len() as u64, expected);
            }

            #[test]
            fn test_every_tile_is_valid_for_its_zoom(
                raw in prop::collection::vec((0u8..=5, 0u32..65536, 0u32..65536), 1..4),
                max_zoom in 5u8..=8
            ) {
                let seeds = seeds_from(&raw);
                let min_seed_zoom = seeds.iter().map(|s| s.zoom).min().unwrap();

                let frontier = expand(&seeds, max_zoom)?;

                for tile in &frontier {
                    let extent = 1u32 << tile.zoom;
                    prop_assert!(tile.zoom >= min_seed_zoom);
                    prop_assert!(tile.zoom <= max_zoom);
                    prop_assert!(tile.x < extent);
                    prop_assert!(tile.y < extent);
                }
            }
        }
    }
}
