//! Biome definitions.

use serde::{Deserialize, Serialize};
use stonehaven_common::ConfigError;

/// One biome competing for cells in the biome map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    /// Display name
    pub id: String,
    /// Frequency of the biome noise
    pub noise_scale: f64,
    /// Higher thresholds claim more cells
    pub threshold: f64,
    /// Score multiplier against other biomes
    pub weight: f64,
    /// Every cell of this biome is water
    pub is_water: bool,
    /// Land cells of this biome may turn into lakes
    pub allow_lakes: bool,
    /// Frequency of the lake noise
    pub lake_noise_scale: f64,
    /// Lake value above which a land cell becomes water
    pub lake_threshold: f64,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            id: "grassland".to_string(),
            noise_scale: 0.05,
            threshold: 0.5,
            weight: 1.0,
            is_water: false,
            allow_lakes: false,
            lake_noise_scale: 0.03,
            lake_threshold: 0.75,
        }
    }
}

impl BiomeConfig {
    /// A land biome with the given name and default tuning.
    #[must_use]
    pub fn land(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// A water biome with the given name and default tuning.
    #[must_use]
    pub fn water(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_water: true,
            ..Self::default()
        }
    }

    /// Enables lakes with the given threshold.
    #[must_use]
    pub fn with_lakes(mut self, lake_threshold: f64) -> Self {
        self.allow_lakes = true;
        self.lake_threshold = lake_threshold;
        self
    }

    /// Biome score for a normalised noise sample.
    #[must_use]
    pub fn score(&self, noise: f64) -> f64 {
        (noise - (1.0 - self.threshold)) * self.weight
    }

    /// Rejects non-finite or non-positive scales.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.noise_scale,
            self.threshold,
            self.weight,
            self.lake_noise_scale,
            self.lake_threshold,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::InvalidSetting(format!(
                "biome {} has a non-finite parameter",
                self.id
            )));
        }
        if self.noise_scale <= 0.0 || self.lake_noise_scale <= 0.0 {
            return Err(ConfigError::InvalidSetting(format!(
                "biome {} noise scales must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biome_defaults() {
        let biome = BiomeConfig::default();
        assert!((biome.noise_scale - 0.05).abs() < f64::EPSILON);
        assert!((biome.lake_threshold - 0.75).abs() < f64::EPSILON);
        assert!(!biome.is_water);
        assert!(!biome.allow_lakes);
    }

    #[test]
    fn test_score_prefers_high_threshold() {
        let low = BiomeConfig {
            threshold: 0.2,
            ..BiomeConfig::land("dry")
        };
        let high = BiomeConfig {
            threshold: 0.8,
            ..BiomeConfig::land("wet")
        };
        assert!(high.score(0.5) > low.score(0.5));
    }

    #[test]
    fn test_biome_validation() {
        assert!(BiomeConfig::water("sea").validate().is_ok());
        let bad = BiomeConfig {
            noise_scale: 0.0,
            ..BiomeConfig::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidSetting(_))));
    }
}
