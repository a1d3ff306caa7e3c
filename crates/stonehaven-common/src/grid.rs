//! Row-major 2D grid container.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::coords::{Direction, GridCoord};

/// Dense `width` x `height` grid, indexed as `[y * width + x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid<T>")]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Unchecked wire form of [`Grid`].
#[derive(Deserialize)]
struct RawGrid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = String;

    fn try_from(raw: RawGrid<T>) -> Result<Self, Self::Error> {
        let len = raw.cells.len();
        Self::from_vec(raw.width, raw.height, raw.cells)
            .ok_or_else(|| format!("grid has {len} cells, expected {}x{}", raw.width, raw.height))
    }
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Copies `src` into this grid with its top-left corner at `origin`.
    /// Cells that would land outside the grid are dropped.
    pub fn blit(&mut self, origin: GridCoord, src: &Self) {
        for (coord, value) in src.iter() {
            let target = coord.offset_by(origin);
            if target.x < self.width && target.y < self.height {
                let index = target.to_index(self.width);
                self.cells[index] = value.clone();
            }
        }
    }
}

impl<T> Grid<T> {
    /// Creates a grid by evaluating `f` for each coordinate in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(GridCoord) -> T) -> Self {
        let cells = (0..width * height)
            .map(|i| f(GridCoord::from_index(i, width)))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Wraps an existing row-major vector. Returns `None` on a size mismatch.
    #[must_use]
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            width,
            height,
            cells,
        })
    }

    /// Returns the width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Gets the cell at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    /// Gets a mutable cell at `(x, y)`.
    #[must_use]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get_mut(y * self.width + x)
    }

    /// Sets the cell at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if let Some(cell) = self.get_mut(x, y) {
            *cell = value;
        }
    }

    /// Returns the neighbor of `coord` in `dir`, if inside the grid.
    #[must_use]
    pub fn neighbor(&self, coord: GridCoord, dir: Direction) -> Option<&T> {
        coord
            .step(dir, self.width, self.height)
            .map(|n| &self.cells[n.to_index(self.width)])
    }

    /// Raw cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterates `(coord, &cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (GridCoord::from_index(i, width), cell))
    }

    /// Iterates the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.width.max(1))
    }

    /// Builds a new grid by mapping every cell.
    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Index<GridCoord> for Grid<T> {
    type Output = T;

    fn index(&self, coord: GridCoord) -> &T {
        &self.cells[coord.to_index(self.width)]
    }
}

impl<T> IndexMut<GridCoord> for Grid<T> {
    fn index_mut(&mut self, coord: GridCoord) -> &mut T {
        &mut self.cells[coord.to_index(self.width)]
    }
}
