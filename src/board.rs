//! Crate `board` introduces the `Board` facade spec.md §11 calls for:
//! the aggregate owning the grid, the root BIG, the registered
//! constraints, the typed-array pool, and the shared logical clock —
//! the BIG/propagator analogue of the teacher's own `Solver` struct that
//! aggregates `AssignStack`, `ClauseDB`, `Eliminator`, `Restarter` and
//! `State` behind one handle. Its core operations
//! (`find_solution`/`count_solutions`/`calc_true_candidates`/
//! `logical_step`/`logical_solve`) are implemented in `search.rs`,
//! `preprocessor.rs` and `logical.rs` as separate `impl Board` blocks,
//! the way the teacher splits `Solver`'s behavior across
//! `solver/{build,conflict,vivify}.rs`.
use crate::big::Big;
use crate::config::SolverConfig;
use crate::constraint::ConstraintIF;
use crate::error::BigError;
use crate::grid::{cell_value_variable, Grid};
use crate::literal::{negate, positive, Literal};
use crate::logical::LogicalStep;
use crate::pool::Pool;
use crate::propagator::Propagator;
use crate::regions::{self, Region};
use crate::stats::SolverStats;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Per-constraint mutable state, shared by reference across clones until
/// the first mutating access (spec.md §5 "copy-on-write protocol").
pub trait ConstraintState: Any {
    fn clone_state(&self) -> Box<dyn ConstraintState>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct StateSlot(Rc<RefCell<Box<dyn ConstraintState>>>);

impl Clone for StateSlot {
    fn clone(&self) -> StateSlot {
        StateSlot(Rc::clone(&self.0))
    }
}

/// One cell's declared content at board-construction time. Exactly one
/// of `value`, `given_pencil_marks`, `center_pencil_marks` applies per
/// spec.md §6; `None` for all three means "default: every value".
#[derive(Clone, Debug, Default)]
pub struct CellInput {
    pub value: Option<usize>,
    pub given: bool,
    pub given_pencil_marks: Option<u64>,
    pub center_pencil_marks: Option<u64>,
    pub region: Option<String>,
}

/// A declarative record describing a board to construct: grid size plus
/// per-cell content. Constraint descriptors are applied by the caller
/// after construction via [`Board::register_constraint`], since the
/// registry mapping name -> factory is explicitly out of scope
/// (spec.md §6).
#[derive(Clone, Debug, Default)]
pub struct BoardInput {
    pub n: usize,
    pub cells: Vec<CellInput>,
}

/// The propagation core's aggregate: grid, BIG, pool, constraints, and
/// the bookkeeping the search driver and preprocessor share.
pub struct Board {
    pub(crate) n: usize,
    pub(crate) grid: Grid,
    pub(crate) big: Big,
    pub(crate) pool: Pool,
    pub(crate) constraints: Vec<Box<dyn ConstraintIF>>,
    state_slots: Vec<StateSlot>,
    pub(crate) regions: Vec<Region>,
    pub(crate) propagator: Propagator,
    pub(crate) config: SolverConfig,
    pub(crate) stats: SolverStats,
    pub(crate) logical_steps: Vec<LogicalStep>,
    pub(crate) invalid_init: bool,
    pub(crate) non_given_count: usize,
    pub(crate) needs_expensive_brute_force_steps: bool,
}

impl Board {
    /// Builds a board from a declarative input record and a set of
    /// already-instantiated constraints. Regions default to
    /// [`regions::default_for`] when no descriptor overrides them.
    pub fn new(input: BoardInput, constraints: Vec<Box<dyn ConstraintIF>>, config: SolverConfig) -> Board {
        let n = input.n;
        let mut pool = Pool::new();
        let mut grid = Grid::new(&mut pool, n);
        let mut non_given_count = n * n;

        let clauses = default_exactly_one_clauses(n);
        let big = Big::new(n * n * n, clauses);
        let mut invalid_init = false;
        let mut initial_givens = Vec::new();

        for (cell, content) in input.cells.iter().enumerate() {
            if let Some(value) = content.value {
                if content.given {
                    match grid.set_as_given(&mut pool, cell, value) {
                        Ok(_) => {
                            non_given_count -= 1;
                            initial_givens.push(positive(cell_value_variable(cell, value, n)));
                        }
                        Err(()) => invalid_init = true,
                    }
                } else if grid.apply_pencil_marks(&mut pool, cell, 1u64 << value).is_err() {
                    invalid_init = true;
                }
            } else if let Some(mask) = content.given_pencil_marks.or(content.center_pencil_marks) {
                if grid.apply_pencil_marks(&mut pool, cell, mask).is_err() {
                    invalid_init = true;
                }
            }
        }

        let regions = regions::default_for(n);
        let propagator = Propagator::new(n * n);

        let mut board = Board {
            n,
            grid,
            big,
            pool,
            constraints,
            state_slots: Vec::new(),
            regions,
            propagator,
            config,
            stats: SolverStats::new(),
            logical_steps: Vec::new(),
            invalid_init,
            non_given_count,
            needs_expensive_brute_force_steps: false,
        };
        board.run_constraint_init();
        if !board.invalid_init && !initial_givens.is_empty() {
            if board.apply_and_propagate(Vec::new(), initial_givens, false).is_invalid() {
                board.invalid_init = true;
            }
        }
        board
    }

    fn run_constraint_init(&mut self) {
        let constraints = std::mem::take(&mut self.constraints);
        let mut kept = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            let output = constraint.init(self);
            if output.invalid_init {
                self.invalid_init = true;
            }
            for (a, b) in output.weak_links {
                self.big.add_implication(a, negate(b));
                self.big.add_implication(b, negate(a));
            }
            for (a, b) in output.implications {
                self.big.add_implication(a, b);
            }
            kept.push(constraint);
            kept.extend(output.add_constraints);
        }
        self.constraints = kept;
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn is_invalid_init(&self) -> bool {
        self.invalid_init
    }

    pub fn non_given_count(&self) -> usize {
        self.non_given_count
    }

    pub fn cell_mask(&self, cell: usize) -> u64 {
        self.grid.mask(&self.pool, cell)
    }

    pub fn is_solved(&self) -> bool {
        self.non_given_count == 0
    }

    /// Asserts a weak link between two candidates: `a` and `b` cannot
    /// both be true (spec.md §7's `addWeakLink`). If either side is
    /// already false, that's fine; if the link immediately contradicts a
    /// given, `invalid_init` is set instead of propagating.
    pub fn add_weak_link(&mut self, a: Literal, b: Literal) {
        let a_true = positive_literal_holds(self, a);
        let b_true = positive_literal_holds(self, b);
        if a_true && b_true {
            self.invalid_init = true;
            return;
        }
        self.big.add_implication(a, negate(b));
        self.big.add_implication(b, negate(a));
    }

    /// Registers a brand-new constraint after construction (used by a
    /// constraint's own `init` to recursively create more, and by host
    /// code wiring up the registry spec.md §6 keeps out of scope).
    pub fn register_constraint(&mut self, constraint: Box<dyn ConstraintIF>) {
        self.constraints.push(constraint);
    }

    /// Allocates a fresh copy-on-write state slot, returning its index.
    pub fn alloc_state(&mut self, initial: Box<dyn ConstraintState>) -> usize {
        self.state_slots.push(StateSlot(Rc::new(RefCell::new(initial))));
        self.state_slots.len() - 1
    }

    pub fn state(&self, slot: usize) -> std::cell::Ref<Box<dyn ConstraintState>> {
        self.state_slots[slot].0.borrow()
    }

    /// Mutable access; deep-copies the slot's contents the first time
    /// more than one board shares it.
    pub fn state_mut(&mut self, slot: usize) -> std::cell::RefMut<Box<dyn ConstraintState>> {
        if Rc::strong_count(&self.state_slots[slot].0) > 1 {
            let copy = self.state_slots[slot].0.borrow().clone_state();
            self.state_slots[slot] = StateSlot(Rc::new(RefCell::new(copy)));
        }
        self.state_slots[slot].0.borrow_mut()
    }

    /// Snapshots this board: clones the grid and the pool buffer it
    /// lives in, and opens a new BIG layer via `subboard_clone`. State
    /// slots are shared by reference (copy-on-write); the constraints
    /// themselves are cloned trait objects.
    pub fn snapshot(&self) -> Board {
        let mut pool = Pool::new();
        // Re-home the grid into the fresh pool by round-tripping through
        // a raw word copy, since `Grid::clone_into` expects the same
        // pool instance; the search driver keeps one pool per board
        // family instead, see `search.rs`.
        let grid = clone_grid_cross_pool(&self.grid, &self.pool, &mut pool);
        Board {
            n: self.n,
            grid,
            big: self.big.subboard_clone(),
            pool,
            constraints: self.constraints.iter().map(|c| c.clone_box()).collect(),
            state_slots: self.state_slots.clone(),
            regions: self.regions.clone(),
            propagator: Propagator::new(self.n * self.n),
            config: self.config.clone(),
            stats: self.stats,
            logical_steps: Vec::new(),
            invalid_init: self.invalid_init,
            non_given_count: self.non_given_count,
            needs_expensive_brute_force_steps: false,
        }
    }
}

fn clone_grid_cross_pool(src: &Grid, src_pool: &Pool, dst_pool: &mut Pool) -> Grid {
    let mut dst = Grid::new(dst_pool, src.n());
    for cell in 0..src.num_cells() {
        let mask = src.mask(src_pool, cell);
        if mask & (1u64 << src.n()) != 0 {
            if let Some(v) = src.given_value0(src_pool, cell) {
                let _ = dst.set_as_given(dst_pool, cell, v);
                continue;
            }
        }
        let allowed = mask & src.value_mask_of();
        let _ = dst.apply_pencil_marks(dst_pool, cell, allowed);
    }
    dst
}

fn positive_literal_holds(board: &Board, lit: Literal) -> bool {
    let var = crate::literal::to_variable(lit);
    let n = board.n;
    let cell = var as usize / n;
    let value0 = var as usize % n;
    let holds_if_given = board.grid.given_value0(&board.pool, cell) == Some(value0);
    if crate::literal::is_positive(lit) {
        holds_if_given
    } else {
        !holds_if_given
    }
}

/// Builds the default exactly-one clauses every board needs: one per
/// cell ("the cell takes exactly one value") and one per full-size
/// region ("the value appears exactly once in the region"), over the
/// cell-value variable space spec.md §3 lays out.
fn default_exactly_one_clauses(n: usize) -> Vec<Vec<Literal>> {
    let mut clauses = Vec::with_capacity(n * n + 3 * n);
    for cell in 0..n * n {
        clauses.push((0..n).map(|v| positive(cell_value_variable(cell, v, n))).collect());
    }
    for region in regions::default_for(n) {
        if !region.full_size {
            continue;
        }
        for value0 in 0..n {
            clauses.push(
                region
                    .cells
                    .iter()
                    .map(|&cell| positive(cell_value_variable(cell, value0, n)))
                    .collect(),
            );
        }
    }
    clauses
}
