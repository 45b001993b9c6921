//! Crate `constraint` is component H: the abstract hooks between the
//! propagation core and a specific constraint implementation (killer
//! cages, arrows, thermometers, ...). The core never interprets a
//! constraint's semantics — it treats every registered constraint as an
//! opaque oracle, the same stance the teacher takes toward clause
//! semantics through its `ClauseIF`/`Propagate` trait boundary.
use crate::board::Board;
use crate::error::PropagationOutcome;
use crate::literal::Literal;

/// Payload a constraint's [`ConstraintIF::init`] may hand back to the
/// board: more constraints to register, weak links to add as binary
/// implications, or implications discovered directly.
#[derive(Default)]
pub struct InitOutput {
    pub invalid_init: bool,
    pub add_constraints: Vec<Box<dyn ConstraintIF>>,
    pub delete_constraint_ids: Vec<usize>,
    pub weak_links: Vec<(Literal, Literal)>,
    pub implications: Vec<(Literal, Literal)>,
}

/// The constraint vtable spec.md 4.H specifies. State that must survive
/// across clones belongs in a board-registered state slot reached
/// through [`Board::state`]/[`Board::state_mut`], never on `self` —
/// mirroring the teacher's own rule that mutable solver state lives on
/// `AssignStack`/`ClauseDB`, not on trait objects that get shared by
/// reference across clones.
pub trait ConstraintIF {
    /// One-shot setup, run once per board before the first propagation.
    /// May recursively register more constraints.
    fn init(&self, board: &mut Board) -> InitOutput;

    /// Called with every assignment. Returns `false` to signal a
    /// contradiction.
    fn enforce(&self, board: &mut Board, cell: usize, value0: usize) -> bool;

    /// Called with every elimination.
    fn enforce_candidate_elim(&self, board: &mut Board, cell: usize, value0: usize) -> bool;

    /// Optional cheap per-pass logic run during search. Default: no-op.
    fn brute_force_step(&self, _board: &mut Board) -> PropagationOutcome {
        PropagationOutcome::Unchanged
    }

    /// Optional richer per-pass logic run only at the search root.
    /// Default: no-op.
    fn preprocessing_step(&self, _board: &mut Board) -> PropagationOutcome {
        PropagationOutcome::Unchanged
    }

    /// Deep-copies this constraint's own identity (not its board state
    /// slot, which follows the copy-on-write protocol in `Board`).
    fn clone_box(&self) -> Box<dyn ConstraintIF>;

    /// Releases any pool resources this constraint privately owns.
    /// Default: nothing to release.
    fn release(&self) {}
}

impl Clone for Box<dyn ConstraintIF> {
    fn clone(&self) -> Box<dyn ConstraintIF> {
        self.clone_box()
    }
}
