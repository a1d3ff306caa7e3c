//! Seeded 2D noise sampling.

use noise::{NoiseFn, Perlin};

/// Falloff shape exponent.
const FALLOFF_A: f64 = 3.0;
/// Falloff steepness.
const FALLOFF_B: f64 = 2.2;

/// Perlin noise normalised to `[0, 1]`, sampled at `offset + (x, y) * scale`.
#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
    offset: [f64; 2],
}

impl NoiseField {
    /// Creates a field with the given noise seed and sample offset.
    #[must_use]
    pub fn new(seed: u32, offset: [f64; 2]) -> Self {
        Self {
            perlin: Perlin::new(seed),
            offset,
        }
    }

    /// Field used for the biome map of a world seed.
    #[must_use]
    pub fn biome(seed: u64) -> Self {
        let offset = [(seed % 10_000) as f64 / 1000.0, (seed % 20_000) as f64 / 1000.0];
        Self::new(seed as u32, offset)
    }

    /// Field used for lakes of a world seed.
    #[must_use]
    pub fn lake(seed: u64) -> Self {
        let s = seed as f64;
        let offset = [(s * 1.123) % 1000.0, (s * 2.357) % 1000.0];
        Self::new((seed as u32).wrapping_add(1), offset)
    }

    /// Normalised sample at cell `(x, y)` with frequency `scale`.
    #[must_use]
    pub fn sample(&self, x: usize, y: usize, scale: f64) -> f64 {
        let px = self.offset[0] + x as f64 * scale;
        let py = self.offset[1] + y as f64 * scale;
        ((self.perlin.get([px, py]) + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

/// Island falloff: 0 at the grid center rising to 1 at the border.
#[must_use]
pub fn falloff01(x: usize, y: usize, width: usize, height: usize) -> f64 {
    let nx = x as f64 / width as f64 * 2.0 - 1.0;
    let ny = y as f64 / height as f64 * 2.0 - 1.0;
    let v = nx.abs().max(ny.abs());
    let va = v.powf(FALLOFF_A);
    let denom = va + (FALLOFF_B - FALLOFF_B * v).powf(FALLOFF_A);
    if denom <= 0.0 {
        return 0.0;
    }
    (va / denom).clamp(0.0, 1.0)
}
