//! Crate `config` provides the propagation core's tunables. The host-facing
//! CLI surface belongs to the worker/UI layer (spec.md section 6); this is
//! a plain data struct, not a CLI parser, matching the shape of the
//! teacher's own `Config` before it grew command-line derives.
use std::time::Duration;

/// Crate version, exported the way the teacher exports `splr::config::VERSION`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tunables for the search driver, propagator, and preprocessor.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// `findSolution`/`countSolutions`: probe each candidate once at the
    /// root, diff the resulting grid, and feed discovered binary
    /// implications back into the BIG before branching (spec.md 4.J).
    pub allow_preprocessing: bool,
    /// Collect `SolverStats` counters during search. Disabled by default
    /// so the hot loop never pays for bookkeeping nobody reads.
    pub enable_stats: bool,
    /// Decide the next guessed value deterministically (lowest bit) or at
    /// random (spec.md 4.I).
    pub random_guesses: bool,
    /// Number of consecutive guesses in the current subtree before the
    /// branch-swap heuristic rotates the job stack (spec.md 4.I: "100 *
    /// multiplier^k").
    pub branch_swap_base_threshold: u32,
    /// Growth factor applied to the branch-swap multiplier after each
    /// swap.
    pub branch_swap_growth: f64,
    /// Decay factor applied to the branch-swap multiplier after every
    /// completed solution, bounded below by 1.0.
    pub branch_swap_decay: f64,
    /// Wall-clock budget between cooperative yields in the search loop
    /// and in `calcTrueCandidates`/the logical dispatcher (spec.md
    /// section 5: "at least every 100ms").
    pub yield_interval: Duration,
    /// Names of logical steps allowed to participate in `logicalStep`/
    /// `logicalSolve`. `None` means "all registered steps". Naked-single,
    /// hidden-single and the constraint dispatcher are always enabled
    /// regardless of this filter (spec.md 4.K).
    pub allowed_logical_steps: Option<Vec<String>>,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            allow_preprocessing: true,
            enable_stats: false,
            random_guesses: false,
            branch_swap_base_threshold: 100,
            branch_swap_growth: 1.5,
            branch_swap_decay: 1.5,
            yield_interval: Duration::from_millis(100),
            allowed_logical_steps: None,
        }
    }
}

impl SolverConfig {
    pub fn with_stats(mut self) -> SolverConfig {
        self.enable_stats = true;
        self
    }

    pub fn without_preprocessing(mut self) -> SolverConfig {
        self.allow_preprocessing = false;
        self
    }

    pub fn with_random_guesses(mut self) -> SolverConfig {
        self.random_guesses = true;
        self
    }

    pub fn is_step_allowed(&self, name: &str) -> bool {
        match &self.allowed_logical_steps {
            None => true,
            Some(names) => names.iter().any(|n| n == name),
        }
    }
}
