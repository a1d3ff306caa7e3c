//! Bit-packed collapse state.
//!
//! One bit per `(cell, module)` pair, laid out as
//! `[(y * width + x) * module_count + module]`, plus a live count of set bits
//! per cell. Allocated once per solve and reset between attempts.

use bitvec::prelude::*;

/// Possibility sets for every cell of a chunk.
#[derive(Debug, Clone)]
pub struct Wave {
    width: usize,
    height: usize,
    module_count: usize,
    bits: BitVec,
    counts: Vec<u32>,
}

impl Wave {
    /// Allocates a fully uncertain wave.
    #[must_use]
    pub fn new(width: usize, height: usize, module_count: usize) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            module_count,
            bits: bitvec![1; cells * module_count],
            counts: vec![module_count as u32; cells],
        }
    }

    /// Makes every module possible everywhere again.
    pub fn reset(&mut self) {
        self.bits.fill(true);
        self.counts.fill(self.module_count as u32);
    }

    /// Grid width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.counts.len()
    }

    /// Remaining possibilities at `cell`.
    #[must_use]
    pub fn count(&self, cell: usize) -> u32 {
        self.counts[cell]
    }

    /// Possibility set of `cell`.
    #[must_use]
    pub fn cell(&self, cell: usize) -> &BitSlice {
        let start = cell * self.module_count;
        &self.bits[start..start + self.module_count]
    }

    /// Intersects `cell` with `mask`. Returns true if any bit was cleared.
    pub fn restrict(&mut self, cell: usize, mask: &BitSlice) -> bool {
        let start = cell * self.module_count;
        let slot = &mut self.bits[start..start + self.module_count];
        *slot &= mask;
        let remaining = slot.count_ones() as u32;
        let changed = remaining != self.counts[cell];
        self.counts[cell] = remaining;
        changed
    }

    /// Leaves only `module` possible at `cell`.
    pub fn collapse_to(&mut self, cell: usize, module: usize) {
        let start = cell * self.module_count;
        let slot = &mut self.bits[start..start + self.module_count];
        slot.fill(false);
        slot.set(module, true);
        self.counts[cell] = 1;
    }

    /// The chosen module of a collapsed cell.
    #[must_use]
    pub fn single(&self, cell: usize) -> Option<usize> {
        if self.counts[cell] == 1 {
            self.cell(cell).first_one()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_wave_is_uncertain() {
        let wave = Wave::new(3, 2, 5);
        assert_eq!(wave.cell_count(), 6);
        assert!((0..6).all(|c| wave.count(c) == 5));
        assert_eq!(wave.single(0), None);
    }

    #[test]
    fn test_restrict_and_collapse() {
        let mut wave = Wave::new(2, 2, 4);
        let mask = bits![1, 0, 1, 0];
        assert!(wave.restrict(1, mask));
        assert_eq!(wave.count(1), 2);
        assert!(!wave.restrict(1, mask));

        wave.collapse_to(1, 2);
        assert_eq!(wave.single(1), Some(2));
        assert_eq!(wave.count(0), 4);

        wave.reset();
        assert_eq!(wave.count(1), 4);
    }

    #[test]
    fn test_restrict_to_nothing() {
        let mut wave = Wave::new(1, 1, 3);
        assert!(wave.restrict(0, bits![0, 0, 0]));
        assert_eq!(wave.count(0), 0);
        assert_eq!(wave.single(0), None);
    }
}
