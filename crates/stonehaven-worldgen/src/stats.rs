//! Summary counts over a generated world.

use serde::Serialize;
use stonehaven_wfc::find_violations;
use tracing::{info, warn};

use crate::generator::GeneratedWorld;

/// Tile and chunk counts of a generated world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorldStats {
    /// Seed of the run
    pub seed: u64,
    /// Tiles whose id contains the water base
    pub water_tiles: usize,
    /// Tiles whose id contains the land base
    pub land_tiles: usize,
    /// Cells the domain mask marked as water
    pub masked_water: usize,
    /// Chunks filled uniformly after exhausting their attempts
    pub fallback_chunks: usize,
    /// Adjacent pairs breaking the rules. Solved chunks are consistent
    /// inside, so these sit on chunk seams or in fallback chunks.
    pub seam_violations: usize,
}

impl WorldStats {
    /// Counts `world`.
    #[must_use]
    pub fn compute<T>(world: &GeneratedWorld<'_, T>) -> Self {
        let settings = world.settings();
        let mut stats = Self {
            seed: world.seed(),
            ..Self::default()
        };

        for id in world.id_grid().cells() {
            if id.contains(settings.water_base.as_str()) {
                stats.water_tiles += 1;
            } else if id.contains(settings.land_base.as_str()) {
                stats.land_tiles += 1;
            }
        }
        stats.masked_water = world.mask().water_count();
        stats.fallback_chunks = world.reports().iter().filter(|r| r.fallback).count();
        stats.seam_violations = find_violations(world.rules(), world.tiles()).len();
        stats
    }

    /// Logs the counts, warning when the world has no water.
    pub fn log(&self) {
        info!(
            "Seed={} WaterTiles={} LandTiles={} MaskedWater={} FallbackChunks={} SeamViolations={}",
            self.seed,
            self.water_tiles,
            self.land_tiles,
            self.masked_water,
            self.fallback_chunks,
            self.seam_violations
        );
        if self.water_tiles == 0 {
            warn!("No water was generated; check the biomes' is_water, allow_lakes and thresholds");
        }
    }
}
