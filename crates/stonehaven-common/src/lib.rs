//! # Stonehaven Common
//!
//! Common types, utilities, and shared abstractions for Project Stonehaven.
//!
//! This crate provides foundational types used across all Stonehaven subsystems:
//! - Grid coordinates, cardinal directions and chunk rectangles
//! - A row-major 2D grid container
//! - Index types (module and biome indices)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod grid;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::grid::*;
    pub use crate::ids::*;
}

pub use prelude::*;
