//! Crate `logical` is component K: the logical-step dispatcher. Holds an
//! ordered list of named heuristics; `logical_step` returns the first
//! that fires, `logical_solve` loops until none do. Heuristics are
//! opaque to the core beyond their `CHANGED|UNCHANGED|INVALID` result
//! and a trace line, mirroring how the teacher's restart heuristics
//! (`restart.rs`'s `Ema`/`RestartExecutor`) are swappable strategies the
//! core dispatches to without knowing their internals.
use crate::board::Board;
use crate::error::PropagationOutcome;
use std::fmt;

/// One named heuristic. `run` reads the board and the BIG and reports
/// whether it fired, plus (when it did) a human-readable trace line.
pub struct LogicalStep {
    pub name: String,
    pub run: Box<dyn Fn(&mut Board) -> (PropagationOutcome, Option<String>)>,
}

/// Accumulated trace lines from a `logical_solve` run (spec.md §6's
/// `desc[]`), with a `Display` impl that joins them one per line —
/// supplemental scaffolding spec.md §11 calls for, mirroring the
/// teacher's own `Display` impls that render internal state as text.
#[derive(Clone, Debug, Default)]
pub struct LogicalTrace(pub Vec<String>);

impl fmt::Display for LogicalTrace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, line) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn naked_single_step(board: &mut Board) -> (PropagationOutcome, Option<String>) {
    for cell in 0..board.n() * board.n() {
        if board.grid.is_given(&board.pool, cell) {
            continue;
        }
        if board.grid.popcount(&board.pool, cell) == 1 {
            let mask = board.grid.mask(&board.pool, cell) & board.grid.value_mask_of();
            let value0 = mask.trailing_zeros() as usize;
            let outcome = board.assign_and_propagate(cell, value0, false);
            return (
                outcome,
                Some(format!("naked single: cell {} must be {}", cell, value0 + 1)),
            );
        }
    }
    (PropagationOutcome::Unchanged, None)
}

fn hidden_single_step(board: &mut Board) -> (PropagationOutcome, Option<String>) {
    for region in board.regions().to_vec() {
        if !region.full_size {
            continue;
        }
        for value0 in 0..board.n() {
            let mut found: Option<usize> = None;
            let mut count = 0;
            for &cell in &region.cells {
                if board.grid.has_candidate(&board.pool, cell, value0) {
                    count += 1;
                    found = Some(cell);
                }
            }
            if count == 1 {
                let cell = found.unwrap();
                if board.grid.given_value0(&board.pool, cell) == Some(value0) {
                    continue;
                }
                let outcome = board.assign_and_propagate(cell, value0, false);
                return (
                    outcome,
                    Some(format!(
                        "hidden single: {} can only go in cell {} in {}",
                        value0 + 1,
                        cell,
                        region.name
                    )),
                );
            }
        }
    }
    (PropagationOutcome::Unchanged, None)
}

fn constraint_dispatch_step(board: &mut Board) -> (PropagationOutcome, Option<String>) {
    for idx in 0..board.constraints.len() {
        let constraint = board.constraints[idx].clone_box();
        let outcome = constraint.brute_force_step(board);
        if outcome != PropagationOutcome::Unchanged {
            return (outcome, Some(format!("constraint {} fired", idx)));
        }
    }
    (PropagationOutcome::Unchanged, None)
}

impl Board {
    /// Registers a named heuristic. Naked-single, hidden-single, and the
    /// constraint dispatcher are built in and always enabled; everything
    /// else is subject to `SolverConfig::allowed_logical_steps`.
    pub fn register_logical_step(&mut self, name: impl Into<String>, run: Box<dyn Fn(&mut Board) -> (PropagationOutcome, Option<String>)>) {
        self.logical_steps.push(LogicalStep { name: name.into(), run });
    }

    /// Runs the first heuristic (built-in or registered) that fires.
    pub fn logical_step(&mut self, cancel: &dyn Fn() -> bool) -> Result<(PropagationOutcome, Option<String>), crate::error::BigError> {
        if cancel() {
            return Err(crate::error::BigError::Cancelled);
        }
        for builtin in [naked_single_step as fn(&mut Board) -> (PropagationOutcome, Option<String>), hidden_single_step, constraint_dispatch_step] {
            let (outcome, desc) = builtin(self);
            if outcome != PropagationOutcome::Unchanged {
                return Ok((outcome, desc));
            }
        }
        for idx in 0..self.logical_steps.len() {
            if !self.config.is_step_allowed(&self.logical_steps[idx].name) {
                continue;
            }
            let step = self.logical_steps.remove(idx);
            let (outcome, desc) = (step.run)(self);
            self.logical_steps.insert(idx, step);
            if outcome != PropagationOutcome::Unchanged {
                return Ok((outcome, desc));
            }
        }
        Ok((PropagationOutcome::Unchanged, None))
    }

    /// Loops `logical_step` until none fire, accumulating every trace
    /// line into a [`LogicalTrace`].
    pub fn logical_solve(&mut self, cancel: &dyn Fn() -> bool) -> Result<LogicalTrace, crate::error::BigError> {
        let mut trace = LogicalTrace::default();
        loop {
            let (outcome, desc) = self.logical_step(cancel)?;
            match outcome {
                PropagationOutcome::Invalid => return Err(crate::error::BigError::Contradiction),
                PropagationOutcome::Unchanged => return Ok(trace),
                PropagationOutcome::Changed => {
                    if let Some(line) = desc {
                        trace.0.push(line);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardInput, CellInput};
    use crate::config::SolverConfig;

    fn input_with_one_narrowed_cell(n: usize) -> BoardInput {
        let mut cells = vec![CellInput::default(); n * n];
        cells[0] = CellInput {
            value: Some(0),
            given: false,
            ..Default::default()
        };
        BoardInput { n, cells }
    }

    #[test]
    fn naked_single_fires_on_a_pre_narrowed_cell() {
        let mut board = Board::new(input_with_one_narrowed_cell(4), vec![], SolverConfig::default());
        let (outcome, desc) = board.logical_step(&|| false).unwrap();
        assert_eq!(outcome, PropagationOutcome::Changed);
        assert!(desc.unwrap().contains("naked single"));
    }

    #[test]
    fn logical_step_respects_cancellation() {
        let mut board = Board::new(input_with_one_narrowed_cell(4), vec![], SolverConfig::default());
        let result = board.logical_step(&|| true);
        assert!(matches!(result, Err(crate::error::BigError::Cancelled)));
    }

    #[test]
    fn logical_solve_stops_when_nothing_fires() {
        let mut board = Board::new(BoardInput { n: 4, cells: vec![CellInput::default(); 16] }, vec![], SolverConfig::default());
        let trace = board.logical_solve(&|| false).unwrap();
        assert!(trace.0.is_empty());
    }
}
