//! Crate `preprocessor` is component J: the one-time root-level pass
//! that probes each live candidate to discover binary implications the
//! initial clause declarations didn't encode directly — the BIG
//! analogue of the teacher's `eliminator.rs` pre/in-processing pass,
//! run once before the search driver takes over.
use crate::board::Board;
use crate::error::PropagationOutcome;
use crate::grid::cell_value_variable;
use crate::literal::positive;

impl Board {
    /// `discoverBinaryImplications` (spec.md 4.J): for every live
    /// candidate, clone the board, assign it, and run the brute-force
    /// logic. A contradiction eliminates the candidate on the real
    /// board; otherwise, any peer candidate the probe eliminated that
    /// the real board hadn't already eliminated is recorded as a new
    /// binary implication in the top BIG layer. Root-only: the search
    /// driver never calls this below depth zero.
    pub(crate) fn discover_binary_implications(&mut self) -> PropagationOutcome {
        let n = self.n;
        let mut outcome = PropagationOutcome::Unchanged;

        for cell in 0..n * n {
            if self.grid.is_given(&self.pool, cell) {
                continue;
            }
            for value0 in 0..n {
                if !self.grid.has_candidate(&self.pool, cell, value0) {
                    continue;
                }

                let base_masks: Vec<u64> = (0..n * n).map(|c| self.grid.mask(&self.pool, c)).collect();

                let mut probe = self.snapshot();
                let probe_outcome = probe.assign_and_propagate(cell, value0, true);
                let probe_outcome = if probe_outcome == PropagationOutcome::Invalid {
                    PropagationOutcome::Invalid
                } else {
                    run_tactics_to_fixpoint(&mut probe)
                };

                if probe_outcome == PropagationOutcome::Invalid {
                    match self.eliminate_and_propagate(cell, value0, true) {
                        PropagationOutcome::Invalid => return PropagationOutcome::Invalid,
                        PropagationOutcome::Changed => outcome = PropagationOutcome::Changed,
                        PropagationOutcome::Unchanged => {}
                    }
                    continue;
                }

                let mut discovered_false_values: Vec<(usize, usize)> = Vec::new();
                for peer_cell in 0..n * n {
                    if peer_cell == cell {
                        continue;
                    }
                    let before = base_masks[peer_cell] & self.grid.value_mask_of();
                    let after = probe.grid.mask(&probe.pool, peer_cell) & probe.grid.value_mask_of();
                    let newly_false = before & !after;
                    for v in 0..n {
                        if newly_false & (1u64 << v) != 0 {
                            discovered_false_values.push((peer_cell, v));
                        }
                    }
                }

                if !discovered_false_values.is_empty() {
                    let lit = positive(cell_value_variable(cell, value0, n));
                    let vars: Vec<_> = discovered_false_values.iter().map(|&(c, v)| cell_value_variable(c, v, n)).collect();
                    self.big.add_neg_implications_batched(lit, &vars);
                    outcome = PropagationOutcome::Changed;
                }
            }
        }

        self.big.rebuild_clause_luts();
        outcome
    }
}

/// A quick, BIG-free narrowing loop over the three classic tactics,
/// cheaper than a full `apply_brute_force_logic` pass — used only to
/// sharpen a probe board before diffing it against the real one.
fn run_tactics_to_fixpoint(board: &mut Board) -> PropagationOutcome {
    let mut overall = PropagationOutcome::Unchanged;
    loop {
        let mut changed = false;
        for tactic in [apply_naked_singles, apply_hidden_singles, apply_pairs] {
            match tactic(board) {
                PropagationOutcome::Invalid => return PropagationOutcome::Invalid,
                PropagationOutcome::Changed => {
                    changed = true;
                    overall = PropagationOutcome::Changed;
                }
                PropagationOutcome::Unchanged => {}
            }
        }
        if !changed {
            return overall;
        }
    }
}

/// Assigns every cell whose mask has narrowed to exactly one live
/// candidate.
fn apply_naked_singles(board: &mut Board) -> PropagationOutcome {
    let n = board.n();
    let mut outcome = PropagationOutcome::Unchanged;
    for cell in 0..n * n {
        if board.grid.is_given(&board.pool, cell) {
            continue;
        }
        if board.grid.popcount(&board.pool, cell) == 1 {
            let mask = board.grid.mask(&board.pool, cell) & board.grid.value_mask_of();
            let value0 = mask.trailing_zeros() as usize;
            match board.assign_and_propagate(cell, value0, true) {
                PropagationOutcome::Invalid => return PropagationOutcome::Invalid,
                o => outcome = outcome.then(o),
            }
        }
    }
    outcome
}

/// Assigns every `(region, value)` pair where exactly one cell in the
/// region still carries that candidate.
fn apply_hidden_singles(board: &mut Board) -> PropagationOutcome {
    let mut outcome = PropagationOutcome::Unchanged;
    for region in board.regions().to_vec() {
        if !region.full_size {
            continue;
        }
        for value0 in 0..board.n() {
            let mut found = None;
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
                match board.assign_and_propagate(cell, value0, true) {
                    PropagationOutcome::Invalid => return PropagationOutcome::Invalid,
                    o => outcome = outcome.then(o),
                }
            }
        }
    }
    outcome
}

/// Naked pairs: when two cells in the same region share an identical
/// two-candidate mask, that pair of values can be eliminated from every
/// other cell in the region.
fn apply_pairs(board: &mut Board) -> PropagationOutcome {
    let mut outcome = PropagationOutcome::Unchanged;
    for region in board.regions().to_vec() {
        if !region.full_size {
            continue;
        }
        let mut pair_masks: Vec<(usize, u64)> = Vec::new();
        for &cell in &region.cells {
            if board.grid.is_given(&board.pool, cell) {
                continue;
            }
            if board.grid.popcount(&board.pool, cell) == 2 {
                pair_masks.push((cell, board.grid.mask(&board.pool, cell) & board.grid.value_mask_of()));
            }
        }
        for i in 0..pair_masks.len() {
            for j in (i + 1)..pair_masks.len() {
                let (cell_a, mask_a) = pair_masks[i];
                let (cell_b, mask_b) = pair_masks[j];
                if mask_a != mask_b {
                    continue;
                }
                for &cell in &region.cells {
                    if cell == cell_a || cell == cell_b {
                        continue;
                    }
                    if board.grid.is_given(&board.pool, cell) {
                        continue;
                    }
                    let current = board.grid.mask(&board.pool, cell) & board.grid.value_mask_of();
                    if current & mask_a == 0 {
                        continue;
                    }
                    match board.grid.apply_pencil_marks(&mut board.pool, cell, !mask_a) {
                        Ok(eliminated) => {
                            if !eliminated.is_empty() {
                                outcome = PropagationOutcome::Changed;
                            }
                        }
                        Err(()) => return PropagationOutcome::Invalid,
                    }
                }
            }
        }
    }
    outcome
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
    fn discover_binary_implications_eliminates_impossible_candidate() {
        // 4x4 with three givens in a row: the fourth row-cell's remaining
        // candidate collapses, and probing the other already-impossible
        // row-peer values should come back invalid and get eliminated.
        let mut cells = vec![CellInput::default(); 16];
        cells[0] = CellInput { value: Some(0), given: true, ..Default::default() };
        cells[1] = CellInput { value: Some(1), given: true, ..Default::default() };
        cells[2] = CellInput { value: Some(2), given: true, ..Default::default() };
        let mut board = Board::new(BoardInput { n: 4, cells }, vec![], SolverConfig::default());
        assert!(!board.is_invalid_init());
        let outcome = board.discover_binary_implications();
        assert_ne!(outcome, PropagationOutcome::Invalid);
        assert_eq!(board.grid.popcount(&board.pool, 3), 1);
    }

    #[test]
    fn discover_binary_implications_is_a_no_op_on_a_solved_board() {
        let board = Board::new(empty_input(4), vec![], SolverConfig::default());
        match board.find_solution(&|| false) {
            crate::search::FindSolutionOutcome::Found(mut solved) => {
                let outcome = solved.discover_binary_implications();
                assert_eq!(outcome, PropagationOutcome::Unchanged);
            }
            _ => panic!("expected a solution"),
        }
    }

    #[test]
    fn naked_single_tactic_fires_inside_run_tactics_to_fixpoint() {
        let mut cells = vec![CellInput::default(); 16];
        cells[1] = CellInput { value: Some(0), given: false, ..Default::default() };
        let mut board = Board::new(BoardInput { n: 4, cells }, vec![], SolverConfig::default());
        let outcome = run_tactics_to_fixpoint(&mut board);
        assert_eq!(outcome, PropagationOutcome::Changed);
        assert!(board.grid.is_given(&board.pool, 1));
    }
}
