//! Biome map and water mask over the full grid.

use stonehaven_common::{BiomeIndex, Grid};
use tracing::debug;

use crate::biome::BiomeConfig;
use crate::noise_field::{falloff01, NoiseField};

/// Weight of the lake noise in the lake value.
const LAKE_NOISE_MIX: f64 = 0.8;
/// Weight of the inverted falloff in the lake value.
const LAKE_FALLOFF_MIX: f64 = 0.2;

/// Seed-dependent macro layout of a world, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainMask {
    biomes: Grid<BiomeIndex>,
    water: Grid<bool>,
}

impl DomainMask {
    /// Builds the biome map and water mask for a `width` x `height` world.
    ///
    /// With no biomes every cell is biome 0 and dry.
    #[must_use]
    pub fn build(width: usize, height: usize, biomes: &[BiomeConfig], seed: u64) -> Self {
        let biome_map = build_biome_map(width, height, biomes, seed);
        let water = build_water_mask(&biome_map, biomes, seed);
        let wet = water.cells().iter().filter(|&&w| w).count();
        debug!("Domain mask {width}x{height}: {wet} water cells");
        Self {
            biomes: biome_map,
            water,
        }
    }

    /// Builds a mask from an explicit water layout, all cells biome 0.
    #[must_use]
    pub fn from_water(water: Grid<bool>) -> Self {
        Self {
            biomes: Grid::new(water.width(), water.height(), BiomeIndex::default()),
            water,
        }
    }

    /// Winning biome per cell.
    #[must_use]
    pub fn biomes(&self) -> &Grid<BiomeIndex> {
        &self.biomes
    }

    /// `true` where the cell is water.
    #[must_use]
    pub fn water(&self) -> &Grid<bool> {
        &self.water
    }

    /// Whether `(x, y)` is water. Out-of-bounds cells are dry.
    #[must_use]
    pub fn is_water(&self, x: usize, y: usize) -> bool {
        self.water.get(x, y).copied().unwrap_or(false)
    }

    /// Number of water cells.
    #[must_use]
    pub fn water_count(&self) -> usize {
        self.water.cells().iter().filter(|&&w| w).count()
    }
}

/// Highest-scoring biome per cell; ties keep the lower index.
fn build_biome_map(
    width: usize,
    height: usize,
    biomes: &[BiomeConfig],
    seed: u64,
) -> Grid<BiomeIndex> {
    if biomes.is_empty() {
        return Grid::new(width, height, BiomeIndex::default());
    }
    let field = NoiseField::biome(seed);
    Grid::from_fn(width, height, |at| {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, biome) in biomes.iter().enumerate() {
            let score = biome.score(field.sample(at.x, at.y, biome.noise_scale));
            if score > best_score {
                best_score = score;
                best = i;
            }
        }
        BiomeIndex::new(best)
    })
}

fn build_water_mask(biome_map: &Grid<BiomeIndex>, biomes: &[BiomeConfig], seed: u64) -> Grid<bool> {
    let (width, height) = (biome_map.width(), biome_map.height());
    let field = NoiseField::lake(seed);
    Grid::from_fn(width, height, |at| {
        let Some(biome) = biomes.get(biome_map[at].get()) else {
            return false;
        };
        if biome.is_water {
            return true;
        }
        if !biome.allow_lakes {
            return false;
        }
        let n = field.sample(at.x, at.y, biome.lake_noise_scale);
        let inland = 1.0 - falloff01(at.x, at.y, width, height);
        let v = (n * LAKE_NOISE_MIX + inland * LAKE_FALLOFF_MIX).clamp(0.0, 1.0);
        v > biome.lake_threshold
    })
}
