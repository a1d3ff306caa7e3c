//! Adjacency rules compiled to per-module bitsets.
//!
//! `allowed(o, dir)` is the set of modules that may sit one step in `dir`
//! from a cell holding `o`. Id lists are resolved once here so the solver's
//! hot loop never touches strings.

use ahash::AHashMap;
use bitvec::prelude::*;
use stonehaven_common::{ConfigError, Direction, ModuleIndex};
use tracing::{debug, warn};

use crate::catalog::Catalog;

/// Catalog adjacency in solver form.
#[derive(Debug, Clone)]
pub struct AdjacencyRules {
    module_count: usize,
    /// `[module * 4 + dir]` -> allowed neighbor modules
    allowed: Vec<BitVec>,
    weights: Vec<f32>,
    ids: Vec<String>,
    index: AHashMap<String, ModuleIndex>,
}

impl AdjacencyRules {
    /// Validates `catalog` and resolves its adjacency lists. Ids that name no
    /// module are ignored with a warning.
    pub fn compile<T>(catalog: &Catalog<T>) -> Result<Self, ConfigError> {
        catalog.validate()?;

        let module_count = catalog.len();
        let index: AHashMap<String, ModuleIndex> = catalog
            .modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), ModuleIndex::new(i)))
            .collect();

        let mut allowed = Vec::with_capacity(module_count * 4);
        let mut unknown = 0usize;
        for module in &catalog.modules {
            for dir in Direction::ALL {
                let mut bits = bitvec![0; module_count];
                for id in module.neighbors.get(dir) {
                    match index.get(id) {
                        Some(target) => bits.set(target.get(), true),
                        None => {
                            warn!("Module {} lists unknown {dir} neighbor {id}", module.id);
                            unknown += 1;
                        }
                    }
                }
                allowed.push(bits);
            }
        }

        debug!(
            "Compiled adjacency for {} modules ({} unknown references)",
            module_count, unknown
        );

        Ok(Self {
            module_count,
            allowed,
            weights: catalog.modules.iter().map(|m| m.weight).collect(),
            ids: catalog.modules.iter().map(|m| m.id.clone()).collect(),
            index,
        })
    }

    /// Number of modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.module_count
    }

    /// Modules allowed one step in `dir` from `module`.
    #[must_use]
    pub fn allowed(&self, module: usize, dir: Direction) -> &BitSlice {
        &self.allowed[module * 4 + dir.index()]
    }

    /// Selection weight of `module`.
    #[must_use]
    pub fn weight(&self, module: usize) -> f32 {
        self.weights[module]
    }

    /// Id of `module`.
    #[must_use]
    pub fn id(&self, module: ModuleIndex) -> Option<&str> {
        self.ids.get(module.get()).map(String::as_str)
    }

    /// Index of the module named `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<ModuleIndex> {
        self.index.get(id).copied()
    }

    /// Whether `a` with `b` one step in `dir` satisfies both modules' lists.
    /// Out-of-range indices are never compatible.
    #[must_use]
    pub fn compatible(&self, a: ModuleIndex, dir: Direction, b: ModuleIndex) -> bool {
        let (a, b) = (a.get(), b.get());
        if a >= self.module_count || b >= self.module_count {
            return false;
        }
        self.allowed(a, dir)[b] && self.allowed(b, dir.opposite())[a]
    }
}
