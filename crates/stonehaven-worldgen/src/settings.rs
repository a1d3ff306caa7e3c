//! Generation settings.
//!
//! Settings live in a TOML file and every field has a default, so a partial
//! file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stonehaven_common::{ConfigError, StonehavenError, StonehavenResult};
use stonehaven_wfc::{CollapseConfig, FallbackPolicy, DEFAULT_MAX_ATTEMPTS};
use tracing::info;

use crate::allowed::{ShoreIds, DEFAULT_LAND_BASE, DEFAULT_WATER_BASE};
use crate::biome::BiomeConfig;

/// Smallest chunk edge the generator will use.
pub const MIN_CHUNK_SIZE: usize = 8;

/// How chunks are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheduling {
    /// One after another with a single shared PRNG
    #[default]
    Sequential,
    /// On the rayon pool, one PRNG per chunk
    Parallel,
}

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// World width in tiles
    pub width: usize,
    /// World height in tiles
    pub height: usize,
    /// Chunk edge in tiles (at least 8)
    pub chunk_size: usize,
    /// World seed; 0 defers to the caller's seed
    pub seed: u64,
    /// Pixel size of one tile in image exports
    pub tile_pixel_size: u32,
    /// Collapse attempts per chunk
    pub max_attempts: usize,
    /// Fail instead of filling a chunk whose attempts all contradicted
    pub strict: bool,
    /// Chunk scheduling
    pub scheduling: Scheduling,
    /// Terrain base of land tiles
    pub land_base: String,
    /// Terrain base of water tiles
    pub water_base: String,
    /// Biomes competing for cells
    pub biomes: Vec<BiomeConfig>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            chunk_size: 64,
            seed: 0,
            tile_pixel_size: 32,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            strict: false,
            scheduling: Scheduling::Sequential,
            land_base: DEFAULT_LAND_BASE.to_string(),
            water_base: DEFAULT_WATER_BASE.to_string(),
            biomes: vec![
                BiomeConfig::land("grassland").with_lakes(0.6),
                BiomeConfig {
                    threshold: 0.35,
                    ..BiomeConfig::water("sea")
                },
            ],
        }
    }
}

impl GenerationSettings {
    /// Loads settings from a TOML file. A missing file yields the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> StonehavenResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&contents)?;
        info!("Loaded generation settings from {}", path.display());
        Ok(settings)
    }

    /// Parses settings from TOML.
    pub fn from_toml_str(contents: &str) -> StonehavenResult<Self> {
        toml::from_str(contents).map_err(|e| StonehavenError::Serialization(e.to_string()))
    }

    /// Saves settings to a TOML file, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> StonehavenResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| StonehavenError::Serialization(e.to_string()))?;
        fs::write(path, contents)?;
        info!("Saved generation settings to {}", path.display());
        Ok(())
    }

    /// Clamps tunables into range and rejects settings that cannot generate.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.land_base.is_empty() || self.water_base.is_empty() {
            return Err(ConfigError::InvalidSetting(
                "land_base and water_base must be non-empty".to_string(),
            ));
        }
        for biome in &self.biomes {
            biome.validate()?;
        }

        self.chunk_size = self.chunk_size.max(MIN_CHUNK_SIZE);
        self.max_attempts = self.max_attempts.max(1);
        self.tile_pixel_size = self.tile_pixel_size.clamp(1, 256);
        Ok(())
    }

    /// `seed` when set, otherwise `fallback`.
    #[must_use]
    pub fn effective_seed(&self, fallback: u64) -> u64 {
        if self.seed != 0 {
            self.seed
        } else {
            fallback
        }
    }

    /// Chunk edge actually used.
    #[must_use]
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(MIN_CHUNK_SIZE)
    }

    /// Solver settings for each chunk.
    #[must_use]
    pub fn collapse_config(&self) -> CollapseConfig {
        CollapseConfig {
            max_attempts: self.max_attempts.max(1),
            fallback: if self.strict {
                FallbackPolicy::Fail
            } else {
                FallbackPolicy::UniformFill
            },
        }
    }

    /// Shoreline tile ids for the configured terrain bases.
    #[must_use]
    pub fn shore_ids(&self) -> ShoreIds {
        ShoreIds::new(&self.land_base, &self.water_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.width, 512);
        assert_eq!(settings.chunk_size, 64);
        assert_eq!(settings.tile_pixel_size, 32);
        assert_eq!(settings.seed, 0);
        assert_eq!(settings.scheduling, Scheduling::Sequential);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = GenerationSettings {
            chunk_size: 2,
            max_attempts: 0,
            tile_pixel_size: 0,
            ..GenerationSettings::default()
        };
        settings.validate().expect("valid");
        assert_eq!(settings.chunk_size, MIN_CHUNK_SIZE);
        assert_eq!(settings.max_attempts, 1);
        assert_eq!(settings.tile_pixel_size, 1);

        settings.width = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_effective_seed() {
        let mut settings = GenerationSettings::default();
        assert_eq!(settings.effective_seed(77), 77);
        settings.seed = 5;
        assert_eq!(settings.effective_seed(77), 5);
    }

    #[test]
    fn test_strict_maps_to_fail() {
        let settings = GenerationSettings {
            strict: true,
            ..GenerationSettings::default()
        };
        assert_eq!(settings.collapse_config().fallback, FallbackPolicy::Fail);
        assert_eq!(
            GenerationSettings::default().collapse_config().fallback,
            FallbackPolicy::UniformFill
        );
    }

    #[test]
    fn test_settings_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("settings.toml");

        let settings = GenerationSettings {
            width: 96,
            seed: 4242,
            scheduling: Scheduling::Parallel,
            ..GenerationSettings::default()
        };
        settings.save_to(&path).expect("Failed to save settings");

        let loaded = GenerationSettings::load_from(&path).expect("Failed to load settings");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = GenerationSettings::from_toml_str(
            r#"
            width = 40
            scheduling = "parallel"

            [[biomes]]
            id = "ocean"
            is_water = true
            "#,
        )
        .expect("parse");
        assert_eq!(settings.width, 40);
        assert_eq!(settings.height, 512);
        assert_eq!(settings.scheduling, Scheduling::Parallel);
        assert_eq!(settings.biomes.len(), 1);
        assert!((settings.biomes[0].noise_scale - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bundled_settings_parse() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/settings.toml");
        let mut settings = GenerationSettings::load_from(path).expect("load");
        settings.validate().expect("valid");
        assert_eq!(settings.width, 256);
        assert_eq!(settings.biomes.len(), 2);
        assert!(settings.biomes[1].is_water);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings =
            GenerationSettings::load_from("/nonexistent/path/settings.toml").expect("defaults");
        assert_eq!(settings, GenerationSettings::default());
    }
}
