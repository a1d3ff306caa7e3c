//! Per-cell candidate ids that shape shorelines around the water mask.
//!
//! A land cell next to water may only take the edge or corner tile whose
//! exterior faces that water. Water cells take the water center. Land shapes
//! with no matching tile (water on opposite sides, or on three sides) get the
//! closest available approximation.

use serde::{Deserialize, Serialize};
use stonehaven_common::{ChunkRect, Direction, Grid, GridCoord};

use crate::mask::DomainMask;

/// Default land terrain base.
pub const DEFAULT_LAND_BASE: &str = "grass";
/// Default water terrain base.
pub const DEFAULT_WATER_BASE: &str = "water";

/// Tile ids of a land/water pairing, built from the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoreIds {
    /// `<land>_center`
    pub land_center: String,
    /// `<water>_center`
    pub water_center: String,
    /// `<land>_edge_<d>`, indexed by [`Direction::index`]
    pub edges: [String; 4],
    /// `<land>_corner_ne`, `_nw`, `_se`, `_sw`
    pub corners: [String; 4],
}

impl Default for ShoreIds {
    fn default() -> Self {
        Self::new(DEFAULT_LAND_BASE, DEFAULT_WATER_BASE)
    }
}

impl ShoreIds {
    /// Ids for the `land` and `water` terrain bases.
    #[must_use]
    pub fn new(land: &str, water: &str) -> Self {
        let edge = |dir: Direction| format!("{land}_edge_{}", dir.letter());
        Self {
            land_center: format!("{land}_center"),
            water_center: format!("{water}_center"),
            edges: Direction::ALL.map(edge),
            corners: ["ne", "nw", "se", "sw"].map(|c| format!("{land}_corner_{c}")),
        }
    }

    /// Edge tile with water on `dir`.
    #[must_use]
    pub fn edge(&self, dir: Direction) -> &str {
        &self.edges[dir.index()]
    }

    /// Corner tile with water on both `a` and `b`. `None` unless the two are
    /// perpendicular.
    #[must_use]
    pub fn corner(&self, a: Direction, b: Direction) -> Option<&str> {
        use Direction::{East, North, South};
        if !a.is_perpendicular(b) {
            return None;
        }
        let (vertical, horizontal) = if matches!(a, North | South) { (a, b) } else { (b, a) };
        let slot = match (vertical, horizontal) {
            (North, East) => 0,
            (North, _) => 1,
            (South, East) => 2,
            _ => 3,
        };
        Some(&self.corners[slot])
    }

    /// Candidate ids for the cell at `at` given the world's water mask.
    /// Neighbors outside the world count as dry.
    #[must_use]
    pub fn for_cell(&self, mask: &DomainMask, at: GridCoord) -> Vec<String> {
        let water = mask.water();
        let is_water = |dir: Direction| {
            at.step(dir, water.width(), water.height())
                .is_some_and(|n| water[n])
        };

        let own = mask.is_water(at.x, at.y);
        let mut ids: Vec<String> = Vec::with_capacity(4);
        if own {
            ids.push(self.water_center.clone());
        } else {
            let wet: Vec<Direction> = Direction::ALL.into_iter().filter(|&d| is_water(d)).collect();
            match wet.as_slice() {
                [] => ids.push(self.land_center.clone()),
                [dir] => ids.push(self.edge(*dir).to_string()),
                [a, b] => match self.corner(*a, *b) {
                    Some(corner) => ids.push(corner.to_string()),
                    None => {
                        ids.push(self.land_center.clone());
                        ids.push(self.edge(*a).to_string());
                        ids.push(self.edge(*b).to_string());
                    }
                },
                [_, _, _] => {
                    // Water side is opposite the dry one.
                    let dry = Direction::ALL
                        .into_iter()
                        .find(|d| !wet.contains(d))
                        .unwrap_or(Direction::North);
                    ids.push(self.edge(dry.opposite()).to_string());
                }
                _ => ids.push(self.land_center.clone()),
            }
        }

        if ids.is_empty() {
            ids.push(if own {
                self.water_center.clone()
            } else {
                self.land_center.clone()
            });
        }
        ids
    }

    /// Candidate ids for every cell of `rect`, in chunk-local coordinates.
    #[must_use]
    pub fn for_chunk(&self, mask: &DomainMask, rect: ChunkRect) -> Grid<Vec<String>> {
        Grid::from_fn(rect.width, rect.height, |local| {
            self.for_cell(mask, local.offset_by(rect.origin))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mask_with(width: usize, height: usize, wet: &[(usize, usize)]) -> DomainMask {
        let mut water = Grid::new(width, height, false);
        for &(x, y) in wet {
            water.set(x, y, true);
        }
        DomainMask::from_water(water)
    }

    #[test]
    fn test_ids_follow_bases() {
        let ids = ShoreIds::new("sand", "lava");
        assert_eq!(ids.land_center, "sand_center");
        assert_eq!(ids.water_center, "lava_center");
        assert_eq!(ids.edge(Direction::West), "sand_edge_w");
        assert_eq!(ids.corner(Direction::East, Direction::South), Some("sand_corner_se"));
        assert_eq!(ids.corner(Direction::East, Direction::West), None);
    }

    #[test]
    fn test_single_water_cell_neighbors() {
        let ids = ShoreIds::default();
        let mask = mask_with(5, 5, &[(2, 2)]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(2, 2)), vec!["water_center"]);
        // Cell north of the water sees water to its south.
        assert_eq!(ids.for_cell(&mask, GridCoord::new(2, 1)), vec!["grass_edge_s"]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(2, 3)), vec!["grass_edge_n"]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(1, 2)), vec!["grass_edge_e"]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(3, 2)), vec!["grass_edge_w"]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(0, 0)), vec!["grass_center"]);
        // Diagonal neighbors do not count.
        assert_eq!(ids.for_cell(&mask, GridCoord::new(1, 1)), vec!["grass_center"]);
    }

    #[test]
    fn test_corner_and_opposite_pair() {
        let ids = ShoreIds::default();
        let mask = mask_with(3, 3, &[(1, 0), (2, 1)]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(1, 1)), vec!["grass_corner_ne"]);

        let mask = mask_with(3, 3, &[(0, 1), (2, 1)]);
        assert_eq!(
            ids.for_cell(&mask, GridCoord::new(1, 1)),
            vec!["grass_center", "grass_edge_e", "grass_edge_w"]
        );
    }

    #[test]
    fn test_three_and_four_water_neighbors() {
        let ids = ShoreIds::default();
        // Dry to the north.
        let mask = mask_with(3, 3, &[(2, 1), (1, 2), (0, 1)]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(1, 1)), vec!["grass_edge_s"]);
        // Dry to the east.
        let mask = mask_with(3, 3, &[(1, 0), (1, 2), (0, 1)]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(1, 1)), vec!["grass_edge_w"]);

        let mask = mask_with(3, 3, &[(1, 0), (2, 1), (1, 2), (0, 1)]);
        assert_eq!(ids.for_cell(&mask, GridCoord::new(1, 1)), vec!["grass_center"]);
    }

    proptest! {
        #[test]
        fn test_every_cell_gets_candidates(
            wet in proptest::collection::vec(any::<bool>(), 36),
        ) {
            let water = Grid::from_vec(6, 6, wet).expect("6x6");
            let mask = DomainMask::from_water(water);
            let ids = ShoreIds::default();
            for y in 0..6 {
                for x in 0..6 {
                    let list = ids.for_cell(&mask, GridCoord::new(x, y));
                    prop_assert!(!list.is_empty());
                    if mask.is_water(x, y) {
                        prop_assert_eq!(list, vec![ids.water_center.clone()]);
                    } else {
                        prop_assert!(!list.contains(&ids.water_center));
                    }
                }
            }
        }
    }

    #[test]
    fn test_chunk_uses_global_neighbors() {
        let ids = ShoreIds::default();
        let mask = mask_with(8, 4, &[(4, 1)]);
        let rect = ChunkRect::new(GridCoord::new(0, 0), 4, 4);
        let chunk = ids.for_chunk(&mask, rect);
        assert_eq!(chunk.width(), 4);
        // Water just across the seam still shapes the border cell.
        assert_eq!(chunk[GridCoord::new(3, 1)], vec!["grass_edge_e"]);
    }
}
