//! Tile module definitions.

use serde::{Deserialize, Serialize};
use stonehaven_common::Direction;

/// Positional role of a module, derived from its id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Interior terrain on every side
    #[default]
    Center,
    /// Exterior terrain on one side
    Edge,
    /// Exterior terrain on two sides
    Corner,
}

impl Category {
    /// Parses the `kind` segment of a module id.
    #[must_use]
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "center" => Some(Self::Center),
            "edge" => Some(Self::Edge),
            "corner" => Some(Self::Corner),
            _ => None,
        }
    }

    /// Number of exterior directions a module of this kind names.
    #[must_use]
    pub const fn exterior_sides(self) -> usize {
        match self {
            Self::Center => 0,
            Self::Edge => 1,
            Self::Corner => 2,
        }
    }
}

/// Module ids that may sit next to a module, per direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjacency {
    /// Modules allowed to the north
    pub north: Vec<String>,
    /// Modules allowed to the east
    pub east: Vec<String>,
    /// Modules allowed to the south
    pub south: Vec<String>,
    /// Modules allowed to the west
    pub west: Vec<String>,
}

impl Adjacency {
    /// Ids allowed in `dir`.
    #[must_use]
    pub fn get(&self, dir: Direction) -> &[String] {
        match dir {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }

    /// Mutable ids allowed in `dir`.
    pub fn get_mut(&mut self, dir: Direction) -> &mut Vec<String> {
        match dir {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        }
    }

    /// Whether `id` is allowed in `dir`.
    #[must_use]
    pub fn allows(&self, dir: Direction, id: &str) -> bool {
        self.get(dir).iter().any(|other| other == id)
    }

    /// Empties every direction.
    pub fn clear(&mut self) {
        for dir in Direction::ALL {
            self.get_mut(dir).clear();
        }
    }
}

/// Terrain label exposed on each edge. Only used while deriving adjacency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sockets {
    /// North edge
    pub north: String,
    /// East edge
    pub east: String,
    /// South edge
    pub south: String,
    /// West edge
    pub west: String,
}

impl Sockets {
    /// Same label on all four edges.
    #[must_use]
    pub fn uniform(label: &str) -> Self {
        Self {
            north: label.to_owned(),
            east: label.to_owned(),
            south: label.to_owned(),
            west: label.to_owned(),
        }
    }

    /// Socket facing `dir`.
    #[must_use]
    pub fn get(&self, dir: Direction) -> &str {
        match dir {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }

    /// Sets the socket facing `dir`.
    pub fn set(&mut self, dir: Direction, label: &str) {
        let slot = match dir {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        };
        label.clone_into(slot);
    }

    /// True when no socket has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Direction::ALL.iter().all(|&d| self.get(d).is_empty())
    }
}

fn default_weight() -> f32 {
    1.0
}

/// One placeable tile definition.
///
/// `tile` is an opaque payload handed to the renderer; the solver never
/// inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileModule<T = String> {
    /// Unique id following `<base>_<kind>[_<dirs>]`
    pub id: String,
    /// Positional role
    #[serde(default)]
    pub category: Category,
    /// Relative selection probability
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Renderer payload
    pub tile: Option<T>,
    /// Allowed neighbors per direction
    #[serde(default)]
    pub neighbors: Adjacency,
    /// Derived edge labels
    #[serde(default)]
    pub sockets: Sockets,
}

impl<T> TileModule<T> {
    /// Creates a module with weight 1 and no payload.
    #[must_use]
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            weight: 1.0,
            tile: None,
            neighbors: Adjacency::default(),
            sockets: Sockets::default(),
        }
    }

    /// Sets the selection weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Attaches a renderer payload.
    #[must_use]
    pub fn with_tile(mut self, tile: T) -> Self {
        self.tile = Some(tile);
        self
    }

    /// Adds `ids` to the allowed list for `dir`.
    #[must_use]
    pub fn allow(mut self, dir: Direction, ids: &[&str]) -> Self {
        self.neighbors
            .get_mut(dir)
            .extend(ids.iter().map(|&id| id.to_owned()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_kinds() {
        assert_eq!(Category::from_kind("edge"), Some(Category::Edge));
        assert_eq!(Category::from_kind("Edge"), None);
        assert_eq!(Category::Corner.exterior_sides(), 2);
    }

    #[test]
    fn test_sockets_set_get() {
        let mut sockets = Sockets::uniform("grass");
        sockets.set(Direction::East, "water");
        assert_eq!(sockets.get(Direction::East), "water");
        assert_eq!(sockets.get(Direction::West), "grass");
        assert!(!sockets.is_empty());
        assert!(Sockets::default().is_empty());
    }

    #[test]
    fn test_module_builder() {
        let module: TileModule = TileModule::new("grass_center", Category::Center)
            .with_weight(2.5)
            .with_tile("tiles/grass".to_owned())
            .allow(Direction::North, &["grass_center", "grass_edge_n"]);
        assert!((module.weight - 2.5).abs() < f32::EPSILON);
        assert!(module.neighbors.allows(Direction::North, "grass_edge_n"));
        assert!(!module.neighbors.allows(Direction::South, "grass_edge_n"));
        assert_eq!(module.tile.as_deref(), Some("tiles/grass"));
    }
}
