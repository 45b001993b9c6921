/*!
# big-solver

A Binary Implication Layered Graph (BIG) and propagation core for a
Sudoku-family constraint solver. A `Board` owns an N·N candidate grid, a
layered implication graph over signed cell-value literals, a registry of
pluggable constraints, and the search/preprocessing machinery that turns
those pieces into `find_solution`, `count_solutions`, `calc_true_candidates`,
`logical_step` and `logical_solve`.

The BIG itself is the reusable core: a primary implication table plus an
ordered list of parent tables inherited from ancestor sub-boards, a cached
transitive closure, and clause-forcing lookup tables built over declared
"exactly one" clauses. Constraints beyond the default row/column/box
uniqueness are supplied by the host through [`ConstraintIF`]; the registry
mapping a constraint's name to a constructor is intentionally out of scope
here, left to whatever embeds this crate.

## Usage

```
use big_solver::board::{Board, BoardInput, CellInput};
use big_solver::config::SolverConfig;
use big_solver::search::FindSolutionOutcome;

let input = BoardInput { n: 4, cells: vec![CellInput::default(); 16] };
let board = Board::new(input, vec![], SolverConfig::default());
match board.find_solution(&|| false) {
    FindSolutionOutcome::Found(solved) => assert!(solved.is_solved()),
    _ => panic!("an empty 4x4 always has a solution"),
}
```
*/
/// Crate `literal` is component C: the literal/variable algebra signed
/// integers encode cell-value assignments with.
pub mod literal;
/// Crate `bitseq` is component A: sorted, duplicate-free `Vec<Variable>`
/// primitives every adjacency row and LUT entry is built from.
pub mod bitseq;
/// Crate `pool` is component B: the typed-array pool backing grid and
/// sub-board buffers so cloning a board is a handful of bulk word copies.
pub mod pool;
/// Crate `implication` is component D: one layer's four polarity-keyed
/// adjacency tables plus the logical clock shared across a BIG family.
pub mod implication;
/// Crate `big` is component E: the layered Binary Implication Graph,
/// its transitive closure, and its clause-forcing lookup tables.
pub mod big;
/// Crate `grid` is component F: the N·N candidate grid.
pub mod grid;
/// Crate `constraint` defines [`constraint::ConstraintIF`], the trait
/// pluggable constraints implement.
pub mod constraint;
/// Crate `propagator` is component G: `Board::apply_and_propagate` and
/// its `assign_and_propagate`/`eliminate_and_propagate` conveniences.
pub mod propagator;
/// Crate `search` is component I: the DFS driver, branch-swap heuristic,
/// and true-candidate enumeration.
pub mod search;
/// Crate `preprocessor` is component J: the one-time root-level pass
/// that discovers binary implications clause declarations didn't encode
/// directly.
pub mod preprocessor;
/// Crate `logical` is component K: the logical-step dispatcher behind
/// `Board::logical_step`/`Board::logical_solve`.
pub mod logical;
/// Crate `regions` builds the default row/column/box tessellation.
pub mod regions;
/// Crate `stats` holds `SolverStats`, the optional per-run counters.
pub mod stats;
/// Crate `board` is the `Board` facade every operation hangs off of.
pub mod board;
/// Crate `config` provides `SolverConfig`, the propagation core's
/// tunables.
pub mod config;
/// Crate `error` defines the four-entry failure taxonomy
/// (`BigError`/`PropagationOutcome`) returned across the public API.
pub mod error;

pub use big::Big;
pub use board::{Board, BoardInput, CellInput, ConstraintState};
pub use config::SolverConfig;
pub use constraint::{ConstraintIF, InitOutput};
pub use error::{BigError, MaybeInconsistent, PropagationOutcome};
pub use logical::LogicalTrace;
pub use regions::Region;
pub use search::{FindSolutionOutcome, TrueCandidates};
pub use stats::SolverStats;
