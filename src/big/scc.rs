//! Strongly-connected-component collapsing and transitive-closure
//! construction over the full-variable implication graph (spec.md 4.E
//! "SCC & closure"). Iterative (not recursive) Tarjan so the walk's
//! stack depth doesn't track the literal count.
use super::Big;
use crate::literal::{negative, positive, to_variable};

fn lit_node(var: usize, positive_target: bool) -> usize {
    var * 2 + if positive_target { 0 } else { 1 }
}

fn node_lit(node: usize) -> crate::literal::Literal {
    let var = (node / 2) as crate::literal::Variable;
    if node % 2 == 0 {
        positive(var)
    } else {
        negative(var)
    }
}

/// Recomputes `big.closure` from scratch over the primary table plus all
/// parent tables, using the full (pseudo-variable-inclusive) view.
pub(super) fn recompute(big: &mut Big) {
    let n = big.num_vars;
    let total = n * 2;
    let mut adj: Vec<Vec<usize>> = Vec::with_capacity(total);
    for node in 0..total {
        let lit = node_lit(node);
        let pos = big.get_pos_consequences_full(lit);
        let neg = big.get_neg_consequences_full(lit);
        let mut succ = Vec::with_capacity(pos.len() + neg.len());
        succ.extend(pos.iter().map(|&v| lit_node(v as usize, true)));
        succ.extend(neg.iter().map(|&v| lit_node(v as usize, false)));
        adj.push(succ);
    }

    let sccs = tarjan(&adj);

    let mut closure_nodes: Vec<Vec<usize>> = vec![Vec::new(); total];
    for component in &sccs {
        let mut gathered: std::collections::BTreeSet<usize> = std::collections::BTreeSet::new();
        for &member in component {
            for &succ in &adj[member] {
                if !component.contains(&succ) {
                    gathered.insert(succ);
                    gathered.extend(closure_nodes[succ].iter());
                }
            }
        }
        for &member in component {
            let mut set = gathered.clone();
            for &other in component {
                if other != member {
                    set.insert(other);
                }
            }
            closure_nodes[member] = set.into_iter().collect();
        }
    }

    for node in 0..total {
        let lit = node_lit(node);
        let mut pos_vars = Vec::new();
        let mut neg_vars = Vec::new();
        for &target in &closure_nodes[node] {
            let var = to_variable(node_lit(target));
            if target % 2 == 0 {
                pos_vars.push(var);
            } else {
                neg_vars.push(var);
            }
        }
        big.closure.set_consequents_raw(lit, true, pos_vars);
        big.closure.set_consequents_raw(lit, false, neg_vars);
    }
}

/// Returns the graph's strongly connected components in the order
/// Tarjan completes them — reverse topological order of the condensation,
/// so a component's successors are always fully resolved by the time it
/// is itself finished.
fn tarjan(adj: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adj.len();
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut lowlink: Vec<usize> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_index = 0usize;
    let mut sccs: Vec<Vec<usize>> = Vec::new();

    // Explicit work stack: (node, next child position to examine).
    let mut work: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if index[start].is_some() {
            continue;
        }
        work.push((start, 0));
        while let Some(&(node, pos)) = work.last() {
            if pos == 0 {
                index[node] = Some(next_index);
                lowlink[node] = next_index;
                next_index += 1;
                stack.push(node);
                on_stack[node] = true;
            }
            if pos < adj[node].len() {
                let child = adj[node][pos];
                work.last_mut().unwrap().1 += 1;
                if index[child].is_none() {
                    work.push((child, 0));
                } else if on_stack[child] {
                    lowlink[node] = lowlink[node].min(index[child].unwrap());
                }
            } else {
                work.pop();
                if let Some(&(parent, _)) = work.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[node]);
                }
                if lowlink[node] == index[node].unwrap() {
                    let mut component = Vec::new();
                    loop {
                        let w = stack.pop().unwrap();
                        on_stack[w] = false;
                        component.push(w);
                        if w == node {
                            break;
                        }
                    }
                    sccs.push(component);
                }
            }
        }
    }
    sccs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::literal::positive;
    use crate::pool::Pool;

    #[test]
    fn closure_captures_transitive_chain() {
        let mut pool = Pool::new();
        let grid = Grid::new(&mut pool, 2);
        let mut big = Big::new(8, vec![]);
        big.add_implication(positive(0), positive(1));
        big.add_implication(positive(1), positive(2));
        big.preprocess(&grid, &pool);
        assert!(big.has_implication(positive(0), positive(2)));
    }

    #[test]
    fn scc_cycle_makes_members_mutually_reachable() {
        let mut pool = Pool::new();
        let grid = Grid::new(&mut pool, 2);
        let mut big = Big::new(8, vec![]);
        big.add_implication(positive(0), positive(1));
        big.add_implication(positive(1), positive(2));
        big.add_implication(positive(2), positive(0));
        big.preprocess(&grid, &pool);
        assert!(big.has_implication(positive(2), positive(1)));
        assert!(big.has_implication(positive(1), positive(0)));
    }
}
