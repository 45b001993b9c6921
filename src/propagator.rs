//! Crate `propagator` is component G, the propagation engine's beating
//! heart. It adds `Board::apply_and_propagate` as a separate `impl
//! Board` block, the way the teacher keeps `Solver`'s conflict-analysis
//! logic in its own `solver/conflict.rs` file instead of cluttering
//! `solver/build.rs`.
use crate::board::Board;
use crate::error::PropagationOutcome;
use crate::grid::cell_value_variable;
use crate::literal::{positive, to_variable, Literal, Variable};
use std::collections::VecDeque;

/// The propagator's working queues. Owned by `Board` and cleared at the
/// start of every `apply_and_propagate` call rather than reallocated, the
/// way the teacher's `AssignStack` reuses its trail buffer across
/// decisions instead of growing a fresh one.
pub struct Propagator {
    elims: VecDeque<Variable>,
    singles: VecDeque<Literal>,
    cell_forcing_pending: VecDeque<usize>,
    cell_forcing_scheduled: Vec<bool>,
}

impl Propagator {
    pub fn new(num_cells: usize) -> Propagator {
        Propagator {
            elims: VecDeque::new(),
            singles: VecDeque::new(),
            cell_forcing_pending: VecDeque::new(),
            cell_forcing_scheduled: vec![false; num_cells],
        }
    }

    fn clear(&mut self) {
        self.elims.clear();
        self.singles.clear();
        self.cell_forcing_pending.clear();
        for flag in self.cell_forcing_scheduled.iter_mut() {
            *flag = false;
        }
    }
}

impl Board {
    /// `applyAndPropagate` (spec.md 4.G). Closes under binary
    /// implications, naked-single detection (implicit in the elim/single
    /// interplay), and cell-forcing, invoking every registered
    /// constraint's `enforce`/`enforce_candidate_elim` along the way.
    pub fn apply_and_propagate(
        &mut self,
        initial_elims: Vec<Variable>,
        initial_singles: Vec<Literal>,
        running_in_brute_force: bool,
    ) -> PropagationOutcome {
        self.propagator.clear();
        let had_initial_work = !initial_elims.is_empty() || !initial_singles.is_empty();
        for v in initial_elims {
            self.propagator.elims.push_back(v);
        }
        for l in initial_singles {
            self.propagator.singles.push_back(l);
        }
        let mut outcome = if had_initial_work {
            PropagationOutcome::Changed
        } else {
            PropagationOutcome::Unchanged
        };

        loop {
            while let Some(var) = self.propagator.elims.pop_front() {
                let cell = var as usize / self.n;
                let value0 = var as usize % self.n;
                if !self.grid.has_candidate(&self.pool, cell, value0) {
                    continue;
                }
                match self.grid.eliminate(&mut self.pool, cell, value0) {
                    Ok(true) => {
                        self.stats.propagations += 1;
                        outcome = PropagationOutcome::Changed;
                        if running_in_brute_force {
                            self.schedule_cell_forcing(cell);
                        }
                    }
                    Ok(false) => {}
                    Err(()) => {
                        log::trace!("cell {} mask emptied eliminating value {}", cell, value0);
                        return PropagationOutcome::Invalid;
                    }
                }
                for idx in 0..self.constraints.len() {
                    let constraint = self.constraints[idx].clone_box();
                    if !constraint.enforce_candidate_elim(self, cell, value0) {
                        return PropagationOutcome::Invalid;
                    }
                }
            }

            if let Some(lit) = self.propagator.singles.pop_front() {
                let var = to_variable(lit);
                let cell = var as usize / self.n;
                let value0 = var as usize % self.n;
                if running_in_brute_force {
                    for v in 0..self.n {
                        if v != value0 && self.grid.has_candidate(&self.pool, cell, v) {
                            self.propagator.elims.push_back(cell_value_variable(cell, v, self.n));
                        }
                    }
                }
                match self.grid.set_as_given(&mut self.pool, cell, value0) {
                    Ok(_) => {
                        self.stats.assignments += 1;
                        outcome = PropagationOutcome::Changed;
                        self.non_given_count = self.non_given_count.saturating_sub(1);
                    }
                    Err(()) => return PropagationOutcome::Invalid,
                }
                let pos = self.big.get_pos_consequences_masked(lit);
                let neg = self.big.get_neg_consequences_masked(lit);
                for v in pos {
                    self.propagator.singles.push_back(positive(v));
                }
                for v in neg {
                    self.propagator.elims.push_back(v);
                }
                for idx in 0..self.constraints.len() {
                    let constraint = self.constraints[idx].clone_box();
                    if !constraint.enforce(self, cell, value0) {
                        return PropagationOutcome::Invalid;
                    }
                }
                continue;
            }

            if running_in_brute_force {
                if let Some(cell) = self.propagator.cell_forcing_pending.pop_front() {
                    self.propagator.cell_forcing_scheduled[cell] = false;
                    self.stats.cell_forcing_invocations += 1;
                    let mask = (self.grid.mask(&self.pool, cell) & self.grid.value_mask_of()) as u32;
                    if mask != 0 {
                        let mask_var = self.big.clauses()[cell].mask_variable(mask);
                        let pos = self.big.get_pos_consequences_masked(positive(mask_var));
                        let neg = self.big.get_neg_consequences_masked(positive(mask_var));
                        for v in pos {
                            self.propagator.singles.push_back(positive(v));
                        }
                        for v in neg {
                            self.propagator.elims.push_back(v);
                        }
                    }
                    continue;
                }
            }

            break;
        }
        outcome
    }

    /// Assigns `cell = value0` and fully propagates, the convenience
    /// entry point the preprocessor and search driver both use.
    pub fn assign_and_propagate(&mut self, cell: usize, value0: usize, running_in_brute_force: bool) -> PropagationOutcome {
        let lit = positive(cell_value_variable(cell, value0, self.n));
        self.apply_and_propagate(Vec::new(), vec![lit], running_in_brute_force)
    }

    /// Eliminates a single candidate and fully propagates.
    pub fn eliminate_and_propagate(&mut self, cell: usize, value0: usize, running_in_brute_force: bool) -> PropagationOutcome {
        let var = cell_value_variable(cell, value0, self.n);
        self.apply_and_propagate(vec![var], Vec::new(), running_in_brute_force)
    }

    fn schedule_cell_forcing(&mut self, cell: usize) {
        if !self.propagator.cell_forcing_scheduled[cell] {
            self.propagator.cell_forcing_scheduled[cell] = true;
            self.propagator.cell_forcing_pending.push_back(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardInput, CellInput};
    use crate::config::SolverConfig;

    fn empty_input(n: usize) -> BoardInput {
        BoardInput {
            n,
            cells: vec![CellInput::default(); n * n],
        }
    }

    #[test]
    fn assigning_a_value_eliminates_it_from_declared_peers() {
        let mut board = Board::new(empty_input(4), vec![], SolverConfig::default());
        let outcome = board.assign_and_propagate(0, 0, true);
        assert_eq!(outcome, PropagationOutcome::Changed);
        // row 1's other cells lose candidate 0 via the row's exactly-one clause.
        assert!(!board.grid.has_candidate(&board.pool, 1, 0));
        assert!(!board.grid.has_candidate(&board.pool, 4, 0));
    }

    #[test]
    fn repeated_propagation_on_stable_state_is_unchanged() {
        let mut board = Board::new(empty_input(4), vec![], SolverConfig::default());
        board.assign_and_propagate(0, 0, true);
        let outcome = board.apply_and_propagate(Vec::new(), Vec::new(), true);
        assert_eq!(outcome, PropagationOutcome::Unchanged);
    }

    #[test]
    fn eliminating_every_candidate_is_invalid() {
        let mut board = Board::new(empty_input(4), vec![], SolverConfig::default());
        for v in 0..4 {
            let outcome = board.eliminate_and_propagate(0, v, true);
            if v == 3 {
                assert_eq!(outcome, PropagationOutcome::Invalid);
            }
        }
    }
}
