//! Crate `grid` is component F: the N·N cell grid. Each cell is a
//! bitmask — bits `0..N-1` are candidate values, bit `N` is the "given"
//! bit meaning "single remaining candidate, already propagated"
//! (spec.md §3). A secondary 64-bit-wide view of the same buffer backs
//! bulk clone, the way the teacher aliases its trail as both a `Vec<Lit>`
//! and a flat word buffer for fast copy-on-clone.
use crate::literal::{negative, positive, Literal, Variable};
use crate::pool::{Handle, Pool};

/// Maps `(cell, 0-based value)` to the cell-value variable spec.md §3
/// names: `cellIndex*N + (value-1)` with `value` 1-based there, i.e.
/// `cellIndex*N + value0` here.
pub fn cell_value_variable(cell: usize, value0: usize, n: usize) -> Variable {
    (cell * n + value0) as Variable
}

pub fn variable_to_cell(var: Variable, n: usize) -> usize {
    var as usize / n
}

pub fn variable_to_value0(var: Variable, n: usize) -> usize {
    var as usize % n
}

/// The bit marking a cell as solved ("given"), one past the highest
/// candidate-value bit.
fn given_bit(n: usize) -> u64 {
    1u64 << n
}

fn value_mask(n: usize) -> u64 {
    (1u64 << n) - 1
}

/// N·N cells, each an `n`-bit candidate mask plus a given bit, backed by
/// a pool-allocated buffer so clones are a single bulk copy.
pub struct Grid {
    n: usize,
    handle: Handle,
}

impl Grid {
    /// Allocates a fresh grid of `n*n` cells, every cell starting with
    /// every candidate present.
    pub fn new(pool: &mut Pool, n: usize) -> Grid {
        let handle = pool.acquire(n * n);
        let full = value_mask(n);
        for word in pool.view_mut(handle) {
            *word = full;
        }
        Grid { n, handle }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn num_cells(&self) -> usize {
        self.n * self.n
    }

    pub fn mask(&self, pool: &Pool, cell: usize) -> u64 {
        pool.view(self.handle)[cell]
    }

    pub fn is_given(&self, pool: &Pool, cell: usize) -> bool {
        self.mask(pool, cell) & given_bit(self.n) != 0
    }

    /// The 0-based value a solved cell holds, or `None` if it isn't
    /// solved yet.
    pub fn given_value0(&self, pool: &Pool, cell: usize) -> Option<usize> {
        if !self.is_given(pool, cell) {
            return None;
        }
        let bits = self.mask(pool, cell) & value_mask(self.n);
        Some(bits.trailing_zeros() as usize)
    }

    pub fn has_candidate(&self, pool: &Pool, cell: usize, value0: usize) -> bool {
        self.mask(pool, cell) & (1u64 << value0) != 0
    }

    pub fn popcount(&self, pool: &Pool, cell: usize) -> u32 {
        (self.mask(pool, cell) & value_mask(self.n)).count_ones()
    }

    /// Bulk clone: acquires a fresh buffer from the pool and word-copies
    /// this grid's contents into it.
    pub fn clone_into(&self, pool: &mut Pool) -> Grid {
        let dst = pool.acquire(self.num_cells());
        let src_words: Vec<u64> = pool.view(self.handle).to_vec();
        pool.view_mut(dst).copy_from_slice(&src_words);
        Grid { n: self.n, handle: dst }
    }

    pub fn release(self, pool: &mut Pool) {
        pool.release(self.handle);
    }

    /// Marks `cell` given to `value0`. No-op success if already given to
    /// the same value; fails if given to a different one or the value
    /// isn't a live candidate. On success, returns the positive literal
    /// that the propagator should enqueue as a new single.
    pub fn set_as_given(&mut self, pool: &mut Pool, cell: usize, value0: usize) -> Result<Option<Literal>, ()> {
        if self.is_given(pool, cell) {
            return if self.given_value0(pool, cell) == Some(value0) {
                Ok(None)
            } else {
                Err(())
            };
        }
        if !self.has_candidate(pool, cell, value0) {
            return Err(());
        }
        let n = self.n;
        let word = &mut pool.view_mut(self.handle)[cell];
        *word = (1u64 << value0) | given_bit(n);
        Ok(Some(positive(cell_value_variable(cell, value0, n))))
    }

    /// Intersects the cell's mask with `allowed`, returning the list of
    /// eliminated 0-based values (for the caller to turn into negative
    /// literals and hand to the propagator) or `Err(())` if the mask
    /// becomes empty.
    pub fn apply_pencil_marks(&mut self, pool: &mut Pool, cell: usize, allowed: u64) -> Result<Vec<usize>, ()> {
        let n = self.n;
        let current = pool.view(self.handle)[cell];
        let value_bits = current & value_mask(n);
        let kept = value_bits & allowed;
        let eliminated_bits = value_bits & !allowed;
        if kept == 0 {
            return Err(());
        }
        pool.view_mut(self.handle)[cell] = kept | (current & given_bit(n));
        let mut eliminated = Vec::new();
        for v in 0..n {
            if eliminated_bits & (1u64 << v) != 0 {
                eliminated.push(v);
            }
        }
        Ok(eliminated)
    }

    /// Eliminates a single candidate, the narrower sibling of
    /// `apply_pencil_marks` the propagator's per-elimination path uses.
    pub fn eliminate(&mut self, pool: &mut Pool, cell: usize, value0: usize) -> Result<bool, ()> {
        if !self.has_candidate(pool, cell, value0) {
            return Ok(false);
        }
        let allowed = !(1u64 << value0);
        self.apply_pencil_marks(pool, cell, allowed)?;
        Ok(true)
    }

    /// Minimum-remaining-values unassigned cell whose candidate set minus
    /// `ignore_mask` has at least two values, early-exiting the moment a
    /// 2-candidate cell is found.
    pub fn find_unassigned_location(&self, pool: &Pool, ignore_mask: u64) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for cell in 0..self.num_cells() {
            if self.is_given(pool, cell) {
                continue;
            }
            let remaining = (self.mask(pool, cell) & value_mask(self.n) & !ignore_mask).count_ones();
            if remaining < 2 {
                continue;
            }
            if remaining == 2 {
                return Some(cell);
            }
            if best.map_or(true, |(_, c)| remaining < c) {
                best = Some((cell, remaining));
            }
        }
        best.map(|(cell, _)| cell)
    }

    pub fn value_mask_of(&self) -> u64 {
        value_mask(self.n)
    }

    /// Positive and negative literals for a cell's current state, used by
    /// weak-link setup and by the preprocessor's grid diffing.
    pub fn cell_literal(&self, cell: usize, value0: usize, is_given: bool) -> Literal {
        let var = cell_value_variable(cell, value0, self.n);
        if is_given {
            positive(var)
        } else {
            negative(var)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_has_every_candidate() {
        let mut pool = Pool::new();
        let g = Grid::new(&mut pool, 4);
        for cell in 0..16 {
            assert_eq!(g.popcount(&pool, cell), 4);
            assert!(!g.is_given(&pool, cell));
        }
    }

    #[test]
    fn set_as_given_then_idempotent_on_same_value() {
        let mut pool = Pool::new();
        let mut g = Grid::new(&mut pool, 4);
        let lit = g.set_as_given(&mut pool, 0, 2).unwrap();
        assert!(lit.is_some());
        assert_eq!(g.given_value0(&pool, 0), Some(2));
        assert_eq!(g.set_as_given(&mut pool, 0, 2), Ok(None));
        assert!(g.set_as_given(&mut pool, 0, 1).is_err());
    }

    #[test]
    fn apply_pencil_marks_eliminates_and_reports() {
        let mut pool = Pool::new();
        let mut g = Grid::new(&mut pool, 4);
        let eliminated = g.apply_pencil_marks(&mut pool, 0, 0b0011).unwrap();
        assert_eq!(eliminated, vec![2, 3]);
        assert_eq!(g.popcount(&pool, 0), 2);
    }

    #[test]
    fn apply_pencil_marks_to_empty_is_contradiction() {
        let mut pool = Pool::new();
        let mut g = Grid::new(&mut pool, 4);
        assert!(g.apply_pencil_marks(&mut pool, 0, 0).is_err());
    }

    #[test]
    fn clone_into_produces_independent_buffer() {
        let mut pool = Pool::new();
        let mut g = Grid::new(&mut pool, 4);
        g.set_as_given(&mut pool, 0, 0).unwrap();
        let clone = g.clone_into(&mut pool);
        g.set_as_given(&mut pool, 1, 0).unwrap();
        assert!(!clone.is_given(&pool, 1));
        assert!(g.is_given(&pool, 1));
    }

    #[test]
    fn find_unassigned_location_prefers_fewest_candidates() {
        let mut pool = Pool::new();
        let mut g = Grid::new(&mut pool, 4);
        g.apply_pencil_marks(&mut pool, 5, 0b0011).unwrap(); // 2 candidates
        let found = g.find_unassigned_location(&pool, 0);
        assert_eq!(found, Some(5));
    }
}
