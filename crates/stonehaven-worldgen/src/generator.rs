//! Chunked world generation.
//!
//! The world is split into square chunks. Each chunk is collapsed on its own
//! against candidate ids derived from the global water mask, then written into
//! the output at its offset. Nothing propagates across chunk seams; the shared
//! water mask is what keeps shorelines continuous.

use rayon::prelude::*;
use serde::Serialize;
use stonehaven_common::{ChunkRect, ConfigError, Grid, ModuleIndex, StonehavenResult};
use stonehaven_wfc::{AdjacencyRules, Catalog, CollapseOutcome, Solver};
use tracing::{debug, info, warn};

use crate::allowed::ShoreIds;
use crate::mask::DomainMask;
use crate::settings::{GenerationSettings, Scheduling};
use crate::stats::WorldStats;

/// Per-chunk PRNG seed mixing constant.
const CHUNK_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// How one chunk was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkReport {
    /// Chunk bounds in world coordinates
    pub rect: ChunkRect,
    /// Collapse attempts used
    pub attempts: usize,
    /// Whether the chunk is a uniform fallback fill
    pub fallback: bool,
}

/// Generates tile worlds from settings and a tile catalog.
#[derive(Debug)]
pub struct WorldGenerator<T = String> {
    settings: GenerationSettings,
    catalog: Catalog<T>,
    rules: AdjacencyRules,
    shore: ShoreIds,
}

impl<T> WorldGenerator<T> {
    /// Validates `settings`, compiles the catalog's adjacency and checks that
    /// the shoreline ids exist.
    pub fn new(mut settings: GenerationSettings, catalog: Catalog<T>) -> StonehavenResult<Self> {
        settings.validate()?;
        let rules = AdjacencyRules::compile(&catalog)?;
        let shore = settings.shore_ids();

        let required = [&shore.land_center, &shore.water_center]
            .into_iter()
            .chain(shore.edges.iter())
            .chain(shore.corners.iter());
        for id in required {
            if rules.index_of(id).is_none() {
                warn!("Shoreline tile {id} is not in the catalog");
            }
        }

        Ok(Self {
            settings,
            catalog,
            rules,
            shore,
        })
    }

    /// Validated settings.
    #[must_use]
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generates a world. `seed` is used unless the settings carry their own.
    pub fn generate(&self, seed: u64) -> StonehavenResult<GeneratedWorld<'_, T>>
    where
        T: Sync,
    {
        let seed = self.settings.effective_seed(seed);
        let mask = DomainMask::build(
            self.settings.width,
            self.settings.height,
            &self.settings.biomes,
            seed,
        );
        self.generate_with_mask(seed, mask)
    }

    /// Generates a world over a precomputed domain mask.
    pub fn generate_with_mask(
        &self,
        seed: u64,
        mask: DomainMask,
    ) -> StonehavenResult<GeneratedWorld<'_, T>>
    where
        T: Sync,
    {
        let (width, height) = (self.settings.width, self.settings.height);
        let water = mask.water();
        if water.width() != width || water.height() != height {
            return Err(ConfigError::RestrictionSize {
                expected: (width, height),
                actual: (water.width(), water.height()),
            }
            .into());
        }

        let chunk_size = self.settings.effective_chunk_size();
        let rects = ChunkRect::partition(width, height, chunk_size);
        let solver = Solver::new(&self.rules, self.settings.collapse_config());
        debug!(
            "Generating {width}x{height} world in {} chunks ({:?})",
            rects.len(),
            self.settings.scheduling
        );

        let solved = match self.settings.scheduling {
            Scheduling::Sequential => {
                let mut rng = fastrand::Rng::with_seed(seed);
                rects
                    .iter()
                    .map(|&rect| self.solve_chunk(&solver, &mask, rect, &mut rng))
                    .collect::<StonehavenResult<Vec<_>>>()?
            }
            Scheduling::Parallel => rects
                .par_iter()
                .enumerate()
                .map(|(i, &rect)| {
                    let mut rng = fastrand::Rng::with_seed(chunk_seed(seed, i));
                    self.solve_chunk(&solver, &mask, rect, &mut rng)
                })
                .collect::<StonehavenResult<Vec<_>>>()?,
        };

        let mut tiles = Grid::new(width, height, ModuleIndex::FIRST);
        let mut reports = Vec::with_capacity(solved.len());
        for (rect, outcome) in rects.into_iter().zip(solved) {
            tiles.blit(rect.origin, &outcome.tiles);
            reports.push(ChunkReport {
                rect,
                attempts: outcome.attempts,
                fallback: !outcome.is_solved(),
            });
        }

        info!(
            "World generated. Seed={seed}, Size={width}x{height}, Chunk={}",
            self.settings.chunk_size
        );

        Ok(GeneratedWorld {
            generator: self,
            seed,
            tiles,
            mask,
            reports,
        })
    }

    fn solve_chunk(
        &self,
        solver: &Solver<'_>,
        mask: &DomainMask,
        rect: ChunkRect,
        rng: &mut fastrand::Rng,
    ) -> StonehavenResult<CollapseOutcome> {
        let allowed = self.shore.for_chunk(mask, rect);
        let outcome = solver.solve(rect.width, rect.height, rng, Some(&allowed))?;
        if !outcome.is_solved() {
            warn!(
                "Chunk at {} fell back to a uniform fill after {} attempts",
                rect.origin, outcome.attempts
            );
        }
        Ok(outcome)
    }
}

/// Independent PRNG seed for chunk `index` of a parallel run.
fn chunk_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(CHUNK_SEED_MIX)
}

/// Output of one generation run.
#[derive(Debug)]
pub struct GeneratedWorld<'a, T = String> {
    generator: &'a WorldGenerator<T>,
    seed: u64,
    tiles: Grid<ModuleIndex>,
    mask: DomainMask,
    reports: Vec<ChunkReport>,
}

impl<'a, T> GeneratedWorld<'a, T> {
    /// Seed the world was generated with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// World width in tiles.
    #[must_use]
    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    /// World height in tiles.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    /// Module index per cell.
    #[must_use]
    pub fn tiles(&self) -> &Grid<ModuleIndex> {
        &self.tiles
    }

    /// Biome map and water mask the world was shaped by.
    #[must_use]
    pub fn mask(&self) -> &DomainMask {
        &self.mask
    }

    /// One report per chunk, in generation order.
    #[must_use]
    pub fn reports(&self) -> &[ChunkReport] {
        &self.reports
    }

    /// Catalog the indices refer to.
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog<T> {
        &self.generator.catalog
    }

    /// Compiled adjacency the world was solved against.
    #[must_use]
    pub fn rules(&self) -> &'a AdjacencyRules {
        &self.generator.rules
    }

    /// Settings of the run.
    #[must_use]
    pub fn settings(&self) -> &'a GenerationSettings {
        &self.generator.settings
    }

    /// Module id at `(x, y)`.
    #[must_use]
    pub fn id_at(&self, x: usize, y: usize) -> Option<&'a str> {
        let index = *self.tiles.get(x, y)?;
        self.catalog().id(index)
    }

    /// Tile payload at `(x, y)`.
    #[must_use]
    pub fn payload_at(&self, x: usize, y: usize) -> Option<&'a T> {
        let index = *self.tiles.get(x, y)?;
        self.catalog().payload(index)
    }

    /// Module ids for the whole world.
    #[must_use]
    pub fn id_grid(&self) -> Grid<&'a str> {
        let catalog = self.catalog();
        self.tiles.map(|&index| catalog.id(index).unwrap_or(""))
    }

    /// Counts tiles, fallbacks and rule violations.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats::compute(self)
    }
}
