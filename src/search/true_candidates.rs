//! `calc_true_candidates` (spec.md 4.I): for every cell and candidate
//! value, count how many distinct solutions hold that value there, up
//! to a per-candidate cap. A candidate with a zero count is provably
//! impossible even though the grid hadn't eliminated it yet.
use crate::board::Board;
use crate::error::PropagationOutcome;
use std::time::{Duration, Instant};

/// Per-cell, per-value solution counts, each capped at the caller's
/// `max_per_cand`.
pub struct TrueCandidates {
    n: usize,
    counts: Vec<usize>,
}

impl TrueCandidates {
    fn new(n: usize) -> TrueCandidates {
        TrueCandidates { n, counts: vec![0; n * n * n] }
    }

    fn index(&self, cell: usize, value0: usize) -> usize {
        cell * self.n + value0
    }

    /// Number of enumerated solutions (up to the cap) holding `value0`
    /// at `cell`. `0` means the candidate is impossible.
    pub fn count(&self, cell: usize, value0: usize) -> usize {
        self.counts[self.index(cell, value0)]
    }

    pub fn is_true_candidate(&self, cell: usize, value0: usize) -> bool {
        self.count(cell, value0) > 0
    }
}

impl Board {
    /// Enumerates solutions, tallying per-cell-per-value occurrence
    /// counts capped at `max_per_cand`, stopping early once every
    /// still-live candidate has either reached the cap or been proven
    /// impossible by exhausting the search. Returns the tally plus
    /// whether the host cancelled before exhaustion.
    pub fn calc_true_candidates(mut self, max_per_cand: usize, cancel: &dyn Fn() -> bool) -> (TrueCandidates, bool) {
        let n = self.n;
        let mut tally = TrueCandidates::new(n);
        if self.invalid_init {
            return (tally, false);
        }
        if max_per_cand == 0 {
            return (tally, false);
        }

        let mut swap = super_branch_swap(&self.config);
        let interval = self.config.yield_interval;
        let mut yield_clock = YieldClock::new(interval);
        let mut stack = vec![self];
        let mut first_pass = true;

        while let Some(mut board) = stack.pop() {
            if yield_clock.should_check() && cancel() {
                return (tally, true);
            }
            let is_depth0 = stack.is_empty();
            if board.apply_brute_force_logic(is_depth0, first_pass) == PropagationOutcome::Invalid {
                first_pass = false;
                continue;
            }
            first_pass = false;
            if board.is_solved() {
                for cell in 0..n * n {
                    if let Some(value0) = board.grid.given_value0(&board.pool, cell) {
                        let idx = tally.index(cell, value0);
                        tally.counts[idx] = tally.counts[idx].saturating_add(1);
                    }
                }
                swap.record_solution();
                if all_capped(&tally, &board, max_per_cand) {
                    return (tally, false);
                }
                continue;
            }
            let cell = match board.grid.find_unassigned_location(&board.pool, 0) {
                Some(c) => c,
                None => continue,
            };
            let mask = board.grid.mask(&board.pool, cell) & board.grid.value_mask_of();
            let mut pushed = false;
            for value0 in (0..n).rev() {
                if mask & (1u64 << value0) == 0 {
                    continue;
                }
                if tally.count(cell, value0) >= max_per_cand {
                    continue;
                }
                let mut branch = board.snapshot();
                if branch.assign_and_propagate(cell, value0, true) != PropagationOutcome::Invalid {
                    stack.push(branch);
                    pushed = true;
                }
            }
            if pushed && swap.record_guess() {
                if stack.len() > 1 {
                    stack.rotate_left(1);
                }
            }
        }
        (tally, false)
    }
}

fn all_capped(tally: &TrueCandidates, board: &Board, max_per_cand: usize) -> bool {
    let n = board.n();
    for cell in 0..n * n {
        for value0 in 0..n {
            if board.grid.has_candidate(&board.pool, cell, value0) && tally.count(cell, value0) < max_per_cand {
                return false;
            }
        }
    }
    true
}

struct BranchSwapLite {
    base_threshold: u32,
    growth: f64,
    decay: f64,
    multiplier: f64,
    guesses_since_last_swap: u32,
}

impl BranchSwapLite {
    fn record_guess(&mut self) -> bool {
        self.guesses_since_last_swap += 1;
        let threshold = self.base_threshold as f64 * self.multiplier;
        if (self.guesses_since_last_swap as f64) > threshold {
            self.guesses_since_last_swap = 0;
            self.multiplier *= self.growth;
            true
        } else {
            false
        }
    }

    fn record_solution(&mut self) {
        self.multiplier = (self.multiplier / self.decay).max(1.0);
    }
}

fn super_branch_swap(config: &crate::config::SolverConfig) -> BranchSwapLite {
    BranchSwapLite {
        base_threshold: config.branch_swap_base_threshold,
        growth: config.branch_swap_growth,
        decay: config.branch_swap_decay,
        multiplier: 1.0,
        guesses_since_last_swap: 0,
    }
}

struct YieldClock {
    interval: Duration,
    last: Instant,
    first: bool,
}

impl YieldClock {
    fn new(interval: Duration) -> YieldClock {
        YieldClock { interval, last: Instant::now(), first: true }
    }

    fn should_check(&mut self) -> bool {
        if self.first || self.last.elapsed() >= self.interval {
            self.first = false;
            self.last = Instant::now();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardInput, CellInput};
    use crate::config::SolverConfig;

    fn empty_input(n: usize) -> BoardInput {
        BoardInput { n, cells: vec![CellInput::default(); n * n] }
    }

    #[test]
    fn every_cell_has_at_least_one_true_candidate_on_an_empty_board() {
        let board = Board::new(empty_input(4), vec![], SolverConfig::default());
        let (tally, cancelled) = board.calc_true_candidates(4, &|| false);
        assert!(!cancelled);
        for cell in 0..16 {
            assert!((0..4).any(|v| tally.is_true_candidate(cell, v)));
        }
    }

    #[test]
    fn a_candidate_ruled_out_by_a_given_peer_has_zero_count() {
        let mut cells = vec![CellInput::default(); 16];
        cells[0] = CellInput { value: Some(0), given: true, ..Default::default() };
        let board = Board::new(BoardInput { n: 4, cells }, vec![], SolverConfig::default());
        let (tally, _) = board.calc_true_candidates(4, &|| false);
        assert!(!tally.is_true_candidate(1, 0));
        assert!(tally.is_true_candidate(0, 0));
    }
}
