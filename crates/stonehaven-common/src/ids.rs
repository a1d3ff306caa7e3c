//! Index types for catalog modules and biomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a module in its catalog.
///
/// The collapse state tracks modules by index only; payloads are never used
/// to recover a module's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleIndex(u32);

impl ModuleIndex {
    /// The first module of a catalog, used by the uniform fallback fill.
    pub const FIRST: Self = Self(0);

    /// Creates a module index from a catalog position.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the catalog position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of a biome in the generation settings' biome list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeIndex(u16);

impl BiomeIndex {
    /// Creates a biome index from a list position.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index as u16)
    }

    /// Returns the list position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}
