//! Crate `error` defines the failure taxonomy returned across the public
//! API. Precondition violations (double release, popping an empty job
//! stack, ...) are bugs, not errors: they are reported with
//! `debug_assert!`/`panic!` at the call site instead of a `Result` variant,
//! matching the teacher's own discipline of keeping `Result` for
//! recoverable, branch-local or global failures only.
use std::fmt;

/// The four-entry error taxonomy of the propagation core.
///
/// `Contradiction` and `InvalidInput` are distinguished because they are
/// handled at different scopes: a contradiction is local to the branch
/// that produced it and the search driver simply discards that branch,
/// while invalid input is global and short-circuits the whole operation.
#[derive(thiserror::Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum BigError {
    /// A cell mask went empty, or a constraint's `enforce`/
    /// `enforce_candidate_elim` returned `false`. Bounded to the current
    /// search branch.
    #[error("contradiction reached during propagation")]
    Contradiction,
    /// The initial grid is inconsistent with the declared constraints
    /// before any search has started (e.g. two givens conflict through a
    /// weak link). Global: the caller should report "no solution"
    /// immediately without entering the search loop.
    #[error("initial board is inconsistent with its constraints")]
    InvalidInput,
    /// The host's cancellation predicate returned true at a cooperative
    /// yield point. Global but recoverable: partial results already
    /// accumulated (solution counts, true-candidate buffers) remain valid.
    #[error("operation cancelled by host")]
    Cancelled,
}

impl BigError {
    /// `true` for errors that only invalidate the current search branch.
    pub fn is_local(self) -> bool {
        matches!(self, BigError::Contradiction)
    }
}

/// `Result` alias for operations whose only failure mode is a
/// contradiction or invalid input, mirroring the teacher's
/// `MaybeInconsistent = Result<(), SolverError>`.
pub type MaybeInconsistent = Result<(), BigError>;

/// Outcome of an operation that may change board state without itself
/// carrying a payload: used by the propagator, the preprocessor's
/// per-pass helpers, and constraint `bruteForceStep`/`preprocessingStep`
/// hooks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropagationOutcome {
    /// Nothing changed; the queues that were given as input had no
    /// effect.
    Unchanged,
    /// At least one cell mask was reduced or a new implication fired.
    Changed,
    /// A cell mask went to zero, or a constraint reported a contradiction.
    Invalid,
}

impl PropagationOutcome {
    pub fn is_invalid(self) -> bool {
        matches!(self, PropagationOutcome::Invalid)
    }
    pub fn is_changed(self) -> bool {
        matches!(self, PropagationOutcome::Changed)
    }
    /// Combine two outcomes as if they had been produced by running one
    /// operation after another: `Invalid` dominates, then `Changed`,
    /// then `Unchanged`.
    pub fn then(self, other: PropagationOutcome) -> PropagationOutcome {
        use PropagationOutcome::*;
        match (self, other) {
            (Invalid, _) | (_, Invalid) => Invalid,
            (Changed, _) | (_, Changed) => Changed,
            _ => Unchanged,
        }
    }
}

impl fmt::Display for PropagationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropagationOutcome::Unchanged => write!(f, "unchanged"),
            PropagationOutcome::Changed => write!(f, "changed"),
            PropagationOutcome::Invalid => write!(f, "invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contradiction_is_local_invalid_input_is_not() {
        assert!(BigError::Contradiction.is_local());
        assert!(!BigError::InvalidInput.is_local());
        assert!(!BigError::Cancelled.is_local());
    }

    #[test]
    fn outcome_then_prefers_invalid_over_changed_over_unchanged() {
        use PropagationOutcome::*;
        assert_eq!(Unchanged.then(Unchanged), Unchanged);
        assert_eq!(Unchanged.then(Changed), Changed);
        assert_eq!(Changed.then(Invalid), Invalid);
        assert_eq!(Invalid.then(Changed), Invalid);
    }
}
