//! Post-hoc adjacency checks over a collapsed grid.

use serde::Serialize;
use stonehaven_common::{Direction, Grid, GridCoord, ModuleIndex};

use crate::rules::AdjacencyRules;

/// A neighboring pair that breaks the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Cell holding `module`
    pub at: GridCoord,
    /// Direction from `at` to the neighbor
    pub dir: Direction,
    /// Module at `at`
    pub module: ModuleIndex,
    /// Module one step in `dir`
    pub neighbor: ModuleIndex,
}

/// Every adjacent pair in `grid` that `rules` does not allow in both
/// directions. Each pair is checked once, via its east and south edges.
#[must_use]
pub fn find_violations(rules: &AdjacencyRules, grid: &Grid<ModuleIndex>) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (at, &module) in grid.iter() {
        for dir in [Direction::East, Direction::South] {
            let Some(&neighbor) = grid.neighbor(at, dir) else {
                continue;
            };
            if !rules.compatible(module, dir, neighbor) {
                violations.push(Violation {
                    at,
                    dir,
                    module,
                    neighbor,
                });
            }
        }
    }
    violations
}
