//! Crate `regions` implements the default region tessellation spec.md §6
//! names but doesn't spell out: "square-root box tessellation when N has
//! an integer root; otherwise the widest-by-shortest factorization."

/// A named set of cell indices in which every value appears at most
/// once (exactly once if `full_size`).
#[derive(Clone, Debug)]
pub struct Region {
    pub name: String,
    pub cells: Vec<usize>,
    pub full_size: bool,
}

/// Builds the default row/column/box regions for an `n x n` grid.
pub fn default_for(n: usize) -> Vec<Region> {
    let mut regions = Vec::with_capacity(3 * n);
    for r in 0..n {
        regions.push(Region {
            name: format!("row {}", r + 1),
            cells: (0..n).map(|c| r * n + c).collect(),
            full_size: true,
        });
    }
    for c in 0..n {
        regions.push(Region {
            name: format!("column {}", c + 1),
            cells: (0..n).map(|r| r * n + c).collect(),
            full_size: true,
        });
    }
    let (box_h, box_w) = box_dimensions(n);
    for by in (0..n).step_by(box_h) {
        for bx in (0..n).step_by(box_w) {
            let mut cells = Vec::with_capacity(box_h * box_w);
            for dy in 0..box_h {
                for dx in 0..box_w {
                    cells.push((by + dy) * n + (bx + dx));
                }
            }
            regions.push(Region {
                name: format!("box ({}, {})", by / box_h + 1, bx / box_w + 1),
                cells,
                full_size: true,
            });
        }
    }
    regions
}

/// `(height, width)` of the default box tessellation: a square root box
/// when `n` is a perfect square, otherwise the widest-by-shortest
/// factorization (the factor pair of `n` closest to a square, width >=
/// height).
fn box_dimensions(n: usize) -> (usize, usize) {
    let root = (n as f64).sqrt().round() as usize;
    if root * root == n {
        return (root, root);
    }
    let mut best = (1usize, n);
    for h in 1..=n {
        if n % h == 0 {
            let w = n / h;
            if h <= w {
                best = (h, w);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_square_gets_square_boxes() {
        assert_eq!(box_dimensions(9), (3, 3));
        assert_eq!(box_dimensions(16), (4, 4));
    }

    #[test]
    fn non_square_gets_widest_by_shortest_factorization() {
        assert_eq!(box_dimensions(6), (2, 3));
        assert_eq!(box_dimensions(12), (3, 4));
    }

    #[test]
    fn default_for_4_has_two_rows_cols_and_four_boxes() {
        let regions = default_for(4);
        let rows = regions.iter().filter(|r| r.name.starts_with("row")).count();
        let cols = regions.iter().filter(|r| r.name.starts_with("column")).count();
        let boxes = regions.iter().filter(|r| r.name.starts_with("box")).count();
        assert_eq!(rows, 4);
        assert_eq!(cols, 4);
        assert_eq!(boxes, 4);
        for region in &regions {
            assert_eq!(region.cells.len(), 4);
        }
    }
}
