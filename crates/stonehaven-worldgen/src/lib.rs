//! # Stonehaven Worldgen
//!
//! Terrain generation for Project Stonehaven.
//!
//! This crate handles:
//! - Biome maps and water masks from seeded noise
//! - Shoreline candidate ids derived from the water mask
//! - Chunked collapse of the world, sequential or parallel
//! - Generation settings and world statistics

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod allowed;
pub mod biome;
pub mod generator;
pub mod mask;
pub mod noise_field;
pub mod settings;
pub mod stats;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::allowed::*;
    pub use crate::biome::*;
    pub use crate::generator::*;
    pub use crate::mask::*;
    pub use crate::noise_field::*;
    pub use crate::settings::*;
    pub use crate::stats::*;
}

pub use prelude::*;
