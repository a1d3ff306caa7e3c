//! # Stonehaven WFC
//!
//! Tile catalogs and the wave-function-collapse solver for Project Stonehaven.
//!
//! This crate handles:
//! - Tile modules, their sockets and adjacency lists
//! - Deriving sockets and adjacency from naming conventions
//! - Compiling adjacency into bitset rules
//! - Collapsing grids with bounded retries and a fallback fill
//! - Checking collapsed grids for rule violations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod collapse;
pub mod module;
pub mod rules;
pub mod sockets;
pub mod templates;
pub mod verify;
pub mod wave;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::collapse::*;
    pub use crate::module::*;
    pub use crate::rules::*;
    pub use crate::sockets::*;
    pub use crate::verify::*;
    pub use crate::wave::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_template_solves() {
        let rules = AdjacencyRules::compile(&templates::grass_water_derived()).expect("compile failed");
        let solver = Solver::new(&rules, CollapseConfig::default());
        let mut rng = fastrand::Rng::with_seed(5);
        let outcome = solver.solve(16, 16, &mut rng, None).expect("solve failed");
        assert_eq!(outcome.tiles.len(), 256);
        if outcome.is_solved() {
            assert!(find_violations(&rules, &outcome.tiles).is_empty());
        }
    }
}
