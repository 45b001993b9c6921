//! `big-solver-cli` is a smoke-test harness, not the worker/UI surface
//! spec.md section 6 puts out of scope. It reads a tiny textual puzzle
//! format from stdin (one line per row, `.` for a blank cell, a digit
//! for a given) and prints the solved grid, mirroring the way the
//! teacher's own `splr` binary is a thin CLI wrapper around the library
//! crate's real API.
use big_solver::board::{Board, BoardInput, CellInput};
use big_solver::config::SolverConfig;
use big_solver::search::FindSolutionOutcome;
use std::io::{self, Read};

fn parse_puzzle(text: &str) -> Option<BoardInput> {
    let rows: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let n = rows.len();
    if n == 0 || !rows.iter().all(|r| r.chars().count() == n) {
        return None;
    }
    let mut cells = Vec::with_capacity(n * n);
    for row in &rows {
        for ch in row.chars() {
            if ch == '.' {
                cells.push(CellInput::default());
            } else {
                let value0 = ch.to_digit(36)? as usize;
                if value0 == 0 || value0 > n {
                    return None;
                }
                cells.push(CellInput {
                    value: Some(value0 - 1),
                    given: true,
                    ..Default::default()
                });
            }
        }
    }
    Some(BoardInput { n, cells })
}

fn render(board: &Board) -> String {
    let n = board.n();
    let mut out = String::new();
    for row in 0..n {
        for col in 0..n {
            let cell = row * n + col;
            match board.cell_mask(cell).trailing_zeros() {
                bit if (bit as usize) < n => {
                    out.push(std::char::from_digit(bit + 1, 36).unwrap_or('?').to_ascii_uppercase())
                }
                _ => out.push('.'),
            }
        }
        out.push('\n');
    }
    out
}

fn main() {
    let mut input = String::new();
    if io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("failed to read puzzle from stdin");
        std::process::exit(1);
    }
    let puzzle = match parse_puzzle(&input) {
        Some(p) => p,
        None => {
            eprintln!("could not parse puzzle: expected N lines of N characters each");
            std::process::exit(1);
        }
    };
    let board = Board::new(puzzle, vec![], SolverConfig::default());
    match board.find_solution(&|| false) {
        FindSolutionOutcome::Found(solved) => print!("{}", render(&solved)),
        FindSolutionOutcome::NoSolution => {
            println!("no solution");
            std::process::exit(2);
        }
        FindSolutionOutcome::Cancelled => unreachable!("cancellation predicate never returns true"),
    }
}
