//! Socket derivation from structured module ids.
//!
//! Module ids follow `<base>_<kind>[_<dirs>]`:
//!
//! ```text
//! grass_center      all four edges show grass
//! grass_edge_n      grass, with the exterior terrain on the north edge
//! grass_corner_ne   grass, with the exterior terrain on north and east
//! ```
//!
//! The exterior terrain comes from a base pairing table (grass <-> water by
//! default). Once every module has sockets, A allows B in direction D iff
//! `A.socket[D] == B.socket[opposite(D)]`.

use ahash::AHashMap;
use stonehaven_common::Direction;
use thiserror::Error;
use tracing::{debug, warn};

use crate::module::{Category, Sockets, TileModule};

/// A module id that does not follow the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("module id `{id}` does not match <base>_<kind>[_<dirs>]: {reason}")]
pub struct PatternMismatch {
    /// Offending id
    pub id: String,
    /// What was wrong with it
    pub reason: &'static str,
}

/// Components of a well-formed module id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedId {
    /// Interior terrain, lower-cased
    pub base: String,
    /// Positional role
    pub kind: Category,
    /// Sides facing the exterior terrain
    pub exterior: Vec<Direction>,
}

/// Splits a module id into base, kind and exterior directions.
pub fn parse_id(id: &str) -> Result<ParsedId, PatternMismatch> {
    let mismatch = |reason| PatternMismatch {
        id: id.to_owned(),
        reason,
    };

    let mut parts = id.split('_');
    let base = parts.next().unwrap_or_default();
    if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(mismatch("base must be non-empty and alphanumeric"));
    }
    let kind = parts
        .next()
        .and_then(Category::from_kind)
        .ok_or_else(|| mismatch("kind must be center, edge or corner"))?;
    let dirs = match parts.next() {
        Some("") => return Err(mismatch("empty direction segment")),
        Some(dirs) => dirs,
        None => "",
    };
    if parts.next().is_some() {
        return Err(mismatch("too many segments"));
    }

    let mut exterior = Vec::with_capacity(2);
    for c in dirs.chars() {
        let dir = Direction::from_letter(c).ok_or_else(|| mismatch("directions must be n, e, s or w"))?;
        if exterior.contains(&dir) {
            return Err(mismatch("direction repeated"));
        }
        exterior.push(dir);
    }
    if exterior.len() != kind.exterior_sides() {
        return Err(mismatch(match kind {
            Category::Center => "center ids take no directions",
            Category::Edge => "edge ids take exactly one direction",
            Category::Corner => "corner ids take exactly two directions",
        }));
    }

    Ok(ParsedId {
        base: base.to_ascii_lowercase(),
        kind,
        exterior,
    })
}

/// Outcome of a derivation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationReport {
    /// Modules whose sockets were assigned
    pub derived: usize,
    /// Modules skipped because their id did not parse
    pub mismatches: Vec<PatternMismatch>,
}

impl DerivationReport {
    /// True when every module parsed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Recomputes sockets and adjacency lists from module ids.
#[derive(Debug, Clone)]
pub struct SocketDeriver {
    exterior: AHashMap<String, String>,
}

impl Default for SocketDeriver {
    fn default() -> Self {
        Self::empty().with_pairing("grass", "water")
    }
}

impl SocketDeriver {
    /// A deriver with no base pairings.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            exterior: AHashMap::new(),
        }
    }

    /// Pairs two bases so each is the other's exterior terrain.
    #[must_use]
    pub fn with_pairing(mut self, a: &str, b: &str) -> Self {
        let (a, b) = (a.to_ascii_lowercase(), b.to_ascii_lowercase());
        self.exterior.insert(a.clone(), b.clone());
        self.exterior.insert(b, a);
        self
    }

    /// Exterior terrain for `base`: the paired base, else the first other
    /// detected center base, else `base` itself.
    fn exterior_for<'a>(&'a self, base: &'a str, detected: &'a [String]) -> &'a str {
        if let Some(paired) = self.exterior.get(base) {
            return paired;
        }
        detected
            .iter()
            .find(|b| b.as_str() != base)
            .map_or(base, String::as_str)
    }

    /// Overwrites the sockets and adjacency lists of every module.
    ///
    /// Modules with malformed ids keep empty sockets and empty lists, and are
    /// never listed as anyone's neighbor. Weights and payloads are untouched.
    pub fn derive<T>(&self, modules: &mut [TileModule<T>]) -> DerivationReport {
        let parsed: Vec<Result<ParsedId, PatternMismatch>> =
            modules.iter().map(|m| parse_id(&m.id)).collect();

        let mut detected: Vec<String> = Vec::new();
        for p in parsed.iter().flatten() {
            if p.kind == Category::Center && !detected.contains(&p.base) {
                detected.push(p.base.clone());
            }
        }

        let mut report = DerivationReport::default();
        for (module, parsed) in modules.iter_mut().zip(&parsed) {
            module.neighbors.clear();
            module.sockets = Sockets::default();

            match parsed {
                Ok(p) => {
                    let exterior = self.exterior_for(&p.base, &detected);
                    let mut sockets = Sockets::uniform(&p.base);
                    for &dir in &p.exterior {
                        sockets.set(dir, exterior);
                    }
                    module.sockets = sockets;
                    module.category = p.kind;
                    report.derived += 1;
                }
                Err(e) => {
                    warn!("{e}");
                    report.mismatches.push(e.clone());
                }
            }
        }

        // Snapshot of (id, sockets) for every module that parsed.
        let derived: Vec<(String, Sockets)> = modules
            .iter()
            .filter(|m| !m.sockets.is_empty())
            .map(|m| (m.id.clone(), m.sockets.clone()))
            .collect();

        for module in modules.iter_mut().filter(|m| !m.sockets.is_empty()) {
            for dir in Direction::ALL {
                let facing = module.sockets.get(dir).to_owned();
                let list = module.neighbors.get_mut(dir);
                for (b_id, b_sockets) in &derived {
                    if b_sockets.get(dir.opposite()) == facing {
                        list.push(b_id.clone());
                    }
                }
            }
        }

        debug!(
            "Derived sockets for {} of {} modules",
            report.derived,
            modules.len()
        );
        report
    }
}
