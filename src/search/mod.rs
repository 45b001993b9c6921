//! Crate `search` is component I: the DFS driver over a LIFO job stack of
//! board snapshots, with the branch-swap heuristic spec.md 4.I describes
//! and the cooperative-yield discipline of section 5. Mirrors the
//! teacher's own split between `solver/build.rs` (setup) and
//! `solver/conflict.rs` (the actual search loop) by keeping the loop in
//! its own file and leaving construction to `board.rs`.
mod true_candidates;

pub use true_candidates::TrueCandidates;

use crate::board::Board;
use crate::error::PropagationOutcome;
use std::time::{Duration, Instant};

/// Outcome of [`Board::find_solution`].
pub enum FindSolutionOutcome {
    Found(Board),
    NoSolution,
    Cancelled,
}

/// Tracks the branch-swap heuristic's state across one search call: a
/// counter of guesses made since the last rotation, and the growing (on
/// swap) / shrinking (on solution) multiplier applied to the base
/// threshold.
struct BranchSwap {
    base_threshold: u32,
    growth: f64,
    decay: f64,
    multiplier: f64,
    guesses_since_last_swap: u32,
}

impl BranchSwap {
    fn new(base_threshold: u32, growth: f64, decay: f64) -> BranchSwap {
        BranchSwap {
            base_threshold,
            growth,
            decay,
            multiplier: 1.0,
            guesses_since_last_swap: 0,
        }
    }

    /// Registers one guess; returns `true` if the stack should be
    /// rotated now.
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

    /// Shrinks the multiplier after a solution is found, bounded at 1.0.
    fn record_solution(&mut self) {
        self.multiplier = (self.multiplier / self.decay).max(1.0);
    }
}

/// A cooperative yield point: checks the cancellation predicate at most
/// once per `interval` of wall-clock time.
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

impl Board {
    /// `applyBruteForceLogic` (spec.md 4.I): re-propagates from scratch,
    /// runs the once-per-root preprocessing pass, and iterates every
    /// constraint's `bruteForceStep`/`preprocessingStep` until a full
    /// pass produces no change.
    pub(crate) fn apply_brute_force_logic(&mut self, is_depth0: bool, is_initial_preprocessing: bool) -> PropagationOutcome {
        let mut outcome = PropagationOutcome::Unchanged;
        if is_initial_preprocessing {
            self.big.preprocess(&self.grid, &self.pool);
            self.stats.preprocessing_rounds += 1;
            if is_depth0 && self.config.allow_preprocessing {
                let pre_outcome = self.discover_binary_implications();
                if pre_outcome == PropagationOutcome::Invalid {
                    return PropagationOutcome::Invalid;
                }
                outcome = outcome.then(pre_outcome);
            }
        }
        let prop_outcome = self.apply_and_propagate(Vec::new(), Vec::new(), true);
        if prop_outcome == PropagationOutcome::Invalid {
            return PropagationOutcome::Invalid;
        }
        outcome = outcome.then(prop_outcome);

        loop {
            let mut pass_changed = false;
            for idx in 0..self.constraints.len() {
                let constraint = self.constraints[idx].clone_box();
                let step_outcome = if is_depth0 || self.needs_expensive_brute_force_steps {
                    constraint.preprocessing_step(self)
                } else {
                    constraint.brute_force_step(self)
                };
                match step_outcome {
                    PropagationOutcome::Invalid => return PropagationOutcome::Invalid,
                    PropagationOutcome::Changed => {
                        pass_changed = true;
                        outcome = PropagationOutcome::Changed;
                    }
                    PropagationOutcome::Unchanged => {}
                }
            }
            if !pass_changed {
                break;
            }
            let prop = self.apply_and_propagate(Vec::new(), Vec::new(), true);
            if prop == PropagationOutcome::Invalid {
                return PropagationOutcome::Invalid;
            }
        }
        outcome
    }

    /// Picks the next branch cell (minimum-remaining-values) and the
    /// guessed value (lowest bit, or a random live bit if configured),
    /// and pushes both children: the eliminate-branch first, the
    /// assign-branch second so it is popped and tried first.
    fn branch(&self, stack: &mut Vec<Board>) -> bool {
        let cell = match self.grid.find_unassigned_location(&self.pool, 0) {
            Some(c) => c,
            None => return false,
        };
        let mask = self.grid.mask(&self.pool, cell) & self.grid.value_mask_of();
        if mask == 0 {
            return false;
        }
        let value0 = if self.config.random_guesses {
            pick_a_live_bit(mask)
        } else {
            mask.trailing_zeros() as usize
        };
        let mut eliminate_branch = self.snapshot();
        eliminate_branch.eliminate_and_propagate(cell, value0, true);
        let mut assign_branch = self.snapshot();
        assign_branch.assign_and_propagate(cell, value0, true);
        stack.push(eliminate_branch);
        stack.push(assign_branch);
        true
    }

    /// `findSolution` (spec.md section 6): DFS with a LIFO job stack,
    /// returning the first solved board found.
    pub fn find_solution(mut self, cancel: &dyn Fn() -> bool) -> FindSolutionOutcome {
        if self.invalid_init {
            return FindSolutionOutcome::NoSolution;
        }
        let interval = self.config.yield_interval;
        let enable_stats = self.config.enable_stats;
        let mut swap = BranchSwap::new(self.config.branch_swap_base_threshold, self.config.branch_swap_growth, self.config.branch_swap_decay);
        let mut yield_clock = YieldClock::new(interval);
        let mut stack = vec![self];
        let mut first_pass = true;

        while let Some(mut board) = stack.pop() {
            if yield_clock.should_check() && cancel() {
                return FindSolutionOutcome::Cancelled;
            }
            let is_depth0 = stack.is_empty();
            if board.apply_brute_force_logic(is_depth0, first_pass) == PropagationOutcome::Invalid {
                first_pass = false;
                continue;
            }
            first_pass = false;
            if board.is_solved() {
                return FindSolutionOutcome::Found(board);
            }
            if !board.branch(&mut stack) {
                continue;
            }
            if enable_stats {
                board.stats.guesses += 1;
                let stats = board.stats;
                let children = stack.len().saturating_sub(2)..stack.len();
                for b in &mut stack[children] {
                    b.stats.merge(&stats);
                }
            }
            if swap.record_guess() {
                log::debug!("branch swap: rotating job stack of {} entries", stack.len());
                rotate_front_to_back(&mut stack);
                for b in stack.iter_mut() {
                    b.needs_expensive_brute_force_steps = true;
                }
                if enable_stats {
                    if let Some(top) = stack.last_mut() {
                        top.stats.branch_swaps += 1;
                    }
                }
            }
        }
        FindSolutionOutcome::NoSolution
    }

    /// `countSolutions` (spec.md section 6): exhausts the search space
    /// (or stops at `max_solutions`), invoking `on_solution` for each
    /// solved board found. The branch-swap multiplier decays on every
    /// solution, the way spec.md 4.I describes.
    pub fn count_solutions(mut self, max_solutions: Option<usize>, cancel: &dyn Fn() -> bool, mut on_solution: impl FnMut(&Board)) -> (usize, bool) {
        if self.invalid_init {
            return (0, false);
        }
        let interval = self.config.yield_interval;
        let mut swap = BranchSwap::new(self.config.branch_swap_base_threshold, self.config.branch_swap_growth, self.config.branch_swap_decay);
        let mut yield_clock = YieldClock::new(interval);
        let mut stack = vec![self];
        let mut first_pass = true;
        let mut count = 0usize;

        while let Some(mut board) = stack.pop() {
            if yield_clock.should_check() && cancel() {
                return (count, true);
            }
            let is_depth0 = stack.is_empty();
            if board.apply_brute_force_logic(is_depth0, first_pass) == PropagationOutcome::Invalid {
                first_pass = false;
                continue;
            }
            first_pass = false;
            if board.is_solved() {
                count += 1;
                on_solution(&board);
                swap.record_solution();
                if max_solutions.map_or(false, |m| count >= m) {
                    return (count, false);
                }
                continue;
            }
            if !board.branch(&mut stack) {
                continue;
            }
            if swap.record_guess() {
                rotate_front_to_back(&mut stack);
                for b in stack.iter_mut() {
                    b.needs_expensive_brute_force_steps = true;
                }
            }
        }
        (count, false)
    }
}

/// "Rotate the stack, moving the front to the back" (spec.md 4.I): the
/// oldest still-pending job (index 0, the bottom of the LIFO stack)
/// becomes the most recently pushed, so the next pop explores a
/// different, cooler-off subtree instead of doubling down on a branch
/// that has produced nothing but guesses.
fn rotate_front_to_back(stack: &mut Vec<Board>) {
    if stack.len() > 1 {
        stack.rotate_left(1);
    }
}

fn pick_a_live_bit(mask: u64) -> usize {
    // A lightweight, dependency-free pseudo-random choice among the live
    // bits: xor the bit positions together to avoid always favoring the
    // same candidate when `random_guesses` is enabled without pulling in
    // a `rand` dependency for one call site.
    let bits: Vec<usize> = (0..64).filter(|&b| mask & (1u64 << b) != 0).collect();
    if bits.is_empty() {
        return 0;
    }
    let seed = bits.iter().fold(0usize, |acc, &b| acc.wrapping_mul(31).wrapping_add(b));
    bits[seed % bits.len()]
}
