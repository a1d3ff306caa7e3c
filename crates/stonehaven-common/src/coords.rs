//! Coordinate types for grid cells, directions, and chunk rectangles.
//!
//! The grid is row-major with `y` growing southwards: north of `(x, y)` is
//! `(x, y - 1)` and east is `(x + 1, y)`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cell coordinate on the tile grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Converts to linear index for row-major array access.
    #[must_use]
    pub const fn to_index(self, width: usize) -> usize {
        self.y * width + self.x
    }

    /// Creates from linear index.
    #[must_use]
    pub const fn from_index(index: usize, width: usize) -> Self {
        Self {
            x: index % width,
            y: index / width,
        }
    }

    /// Returns the neighboring coordinate in `dir`, or `None` when it falls
    /// outside a `width` x `height` grid.
    #[must_use]
    pub fn step(self, dir: Direction, width: usize, height: usize) -> Option<Self> {
        let (dx, dy) = dir.offset();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        (x < width && y < height).then_some(Self { x, y })
    }

    /// Offsets this coordinate by a chunk origin.
    #[must_use]
    pub const fn offset_by(self, origin: Self) -> Self {
        Self {
            x: self.x + origin.x,
            y: self.y + origin.y,
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards `y - 1`
    North = 0,
    /// Towards `x + 1`
    East = 1,
    /// Towards `y + 1`
    South = 2,
    /// Towards `x - 1`
    West = 3,
}

impl Direction {
    /// All directions in N, E, S, W order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Index into per-direction arrays (N=0, E=1, S=2, W=3).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Grid offset `(dx, dy)` of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Single-letter name used in tile ids (`n`, `e`, `s`, `w`).
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::North => 'n',
            Self::East => 'e',
            Self::South => 's',
            Self::West => 'w',
        }
    }

    /// Parses a lower-case single-letter direction name.
    #[must_use]
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'n' => Some(Self::North),
            'e' => Some(Self::East),
            's' => Some(Self::South),
            'w' => Some(Self::West),
            _ => None,
        }
    }

    /// Whether `other` is at a right angle to this direction.
    #[must_use]
    pub const fn is_perpendicular(self, other: Self) -> bool {
        (self as usize + other as usize) % 2 == 1
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// Rectangular region of the grid solved as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkRect {
    /// Top-left corner in grid coordinates
    pub origin: GridCoord,
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
}

impl ChunkRect {
    /// Creates a new chunk rectangle.
    #[must_use]
    pub const fn new(origin: GridCoord, width: usize, height: usize) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Number of cells in the rectangle.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Splits a `width` x `height` grid into `chunk_size` squares, row by row.
    /// The last chunk of each row and column is clipped to the grid.
    #[must_use]
    pub fn partition(width: usize, height: usize, chunk_size: usize) -> Vec<Self> {
        let chunk_size = chunk_size.max(1);
        let mut rects = Vec::with_capacity(width.div_ceil(chunk_size) * height.div_ceil(chunk_size));
        for cy in (0..height).step_by(chunk_size) {
            for cx in (0..width).step_by(chunk_size) {
                rects.push(Self::new(
                    GridCoord::new(cx, cy),
                    chunk_size.min(width - cx),
                    chunk_size.min(height - cy),
                ));
            }
        }
        rects
    }
}
