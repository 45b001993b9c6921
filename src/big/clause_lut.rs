//! Clause-forcing LUT rebuild (spec.md 4.E "Clause-forcing LUT rebuild").
//! Every LUT entry is realized as an ordinary row of the implication
//! table, keyed by the clause's pseudo-variable for that subset bitmask
//! — so `Propagator::lookup` just calls `get_pos/neg_consequences` on
//! the pseudo-variable like it would on any real literal.
use super::Big;
use crate::bitseq;
use crate::literal::{negate, positive};

pub(super) fn rebuild_all(big: &mut Big) {
    for clause_id in 0..big.clauses.len() {
        rebuild_one(big, clause_id);
    }
}

fn rebuild_one(big: &mut Big, clause_id: usize) {
    let (literals, pseudo_start, last_rebuilt_at) = {
        let c = &big.clauses[clause_id];
        (c.literals.clone(), c.pseudo_start, c.last_rebuilt_at)
    };
    let is_root = big.parents.is_empty();
    let width = literals.len();
    let clock = big.clock.clone();

    let changed = literals.iter().any(|&lit| {
        big.primary.last_updated_at(lit, true) > last_rebuilt_at
            || big.primary.last_updated_at(lit, false) > last_rebuilt_at
    });
    if !is_root && !changed {
        return;
    }

    // Singleton bitmasks: the LUT entry is just the literal's top-layer
    // consequents.
    for i in 0..width {
        let mask_var = pseudo_start + (1 << i);
        let lit = literals[i];
        let pos = big.primary.pos_consequents(lit).to_vec();
        let neg = big.primary.neg_consequents(lit).to_vec();
        big.primary.add_pos_implications_batched(positive(mask_var), &pos, &clock);
        big.primary.add_neg_implications_batched(positive(mask_var), &neg, &clock);
    }

    // Larger bitmasks, processed in increasing popcount order so `rest`
    // is always already filled by the time it's needed.
    let mut masks: Vec<u32> = (1..(1u32 << width)).filter(|m| m.count_ones() >= 2).collect();
    masks.sort_by_key(|m| m.count_ones());

    // A popcount level only licenses stopping once every mask at that
    // level turned out empty (spec.md 4.E step 4): a wider mask
    // decomposes from a narrower one that may still carry forcing, so one
    // empty mask within a level says nothing about its siblings.
    let mut exhausted_at_popcount: Option<u32> = None;
    let mut idx = 0;
    while idx < masks.len() {
        let popcount = masks[idx].count_ones();
        if exhausted_at_popcount.map_or(false, |p| popcount > p) {
            break;
        }
        let level_end = idx + masks[idx..].iter().take_while(|&&m| m.count_ones() == popcount).count();
        let mut level_all_empty = true;
        for &mask in &masks[idx..level_end] {
            let first_bit = mask & mask.wrapping_neg();
            let rest = mask ^ first_bit;
            let first_var = pseudo_start + first_bit as crate::literal::Variable;
            let rest_var = pseudo_start + rest as crate::literal::Variable;
            let mut pos_entry = bitseq::intersection(
                big.primary.pos_consequents(positive(first_var)),
                big.primary.pos_consequents(positive(rest_var)),
            );
            let mut neg_entry = bitseq::intersection(
                big.primary.neg_consequents(positive(first_var)),
                big.primary.neg_consequents(positive(rest_var)),
            );
            if !is_root {
                let mask_var = pseudo_start + mask as crate::literal::Variable;
                pos_entry.retain(|&v| !big.parents.iter().any(|p| p.borrow().has_implication(positive(mask_var), positive(v))));
                neg_entry.retain(|&v| !big.parents.iter().any(|p| p.borrow().has_implication(positive(mask_var), negate(positive(v)))));
            }
            if !pos_entry.is_empty() || !neg_entry.is_empty() {
                level_all_empty = false;
            }
            let mask_var = pseudo_start + mask as crate::literal::Variable;
            big.primary.add_pos_implications_batched(positive(mask_var), &pos_entry, &clock);
            big.primary.add_neg_implications_batched(positive(mask_var), &neg_entry, &clock);
        }
        if level_all_empty {
            exhausted_at_popcount = Some(popcount);
        }
        idx = level_end;
    }

    // Cross implications between complementary non-empty subsets, root
    // layer only, as a summary edge.
    if is_root {
        let full = (1u32 << width) - 1;
        for mask in 1..full {
            let complement = full ^ mask;
            if mask >= complement {
                continue;
            }
            let mask_var = pseudo_start + mask as crate::literal::Variable;
            let complement_var = pseudo_start + complement as crate::literal::Variable;
            let mask_has_forcing = !big.primary.pos_consequents(positive(mask_var)).is_empty()
                || !big.primary.neg_consequents(positive(mask_var)).is_empty();
            let complement_has_forcing = !big.primary.pos_consequents(positive(complement_var)).is_empty()
                || !big.primary.neg_consequents(positive(complement_var)).is_empty();
            if mask_has_forcing && complement_has_forcing {
                big.primary
                    .add_implication(positive(mask_var), negate(positive(complement_var)), &clock);
            }
        }
    }

    big.clauses[clause_id].last_rebuilt_at = big.clock.current();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::literal::positive;
    use crate::pool::Pool;

    #[test]
    fn singleton_mask_mirrors_literal_consequents() {
        let mut pool = Pool::new();
        let grid = Grid::new(&mut pool, 2);
        let mut big = Big::new(8, vec![vec![positive(0), positive(1)]]);
        big.add_implication(positive(0), positive(4));
        big.preprocess(&grid, &pool);
        let clause = &big.clauses()[0];
        let singleton = clause.mask_variable(0b01);
        assert!(big.has_implication(positive(singleton), positive(4)));
    }

    #[test]
    fn wide_mask_is_intersection_of_its_members() {
        let mut pool = Pool::new();
        let grid = Grid::new(&mut pool, 2);
        let mut big = Big::new(8, vec![vec![positive(0), positive(1)]]);
        big.add_implication(positive(0), positive(5));
        big.add_implication(positive(1), positive(5));
        big.add_implication(positive(0), positive(6));
        big.preprocess(&grid, &pool);
        let clause = &big.clauses()[0];
        let both = clause.mask_variable(0b11);
        assert!(big.has_implication(positive(both), positive(5)));
        assert!(!big.has_implication(positive(both), positive(6)));
    }

    // Regression for an early-stop that fired as soon as *a* mask at a
    // popcount level came up empty, instead of waiting for the whole
    // level. With literals L0..L3 and only L0, L2, L3 implying a common
    // consequent, the popcount-2 level has both empty masks ({L0,L1},
    // {L1,L2}, {L1,L3}) and non-empty ones ({L0,L2}, {L0,L3}, {L2,L3}).
    // {L0,L1} is swept first in mask order and is empty, but {L2,L3} is
    // not, so the level as a whole isn't exhausted and {L0,L2,L3} (which
    // decomposes through {L2,L3}) must still carry the forcing through.
    #[test]
    fn a_later_masks_empty_entry_does_not_shadow_a_non_empty_sibling_at_the_same_level() {
        let mut pool = Pool::new();
        let grid = Grid::new(&mut pool, 2);
        let mut big = Big::new(17, vec![vec![positive(0), positive(1), positive(2), positive(3)]]);
        big.add_implication(positive(0), positive(16));
        big.add_implication(positive(2), positive(16));
        big.add_implication(positive(3), positive(16));
        big.preprocess(&grid, &pool);
        let clause = &big.clauses()[0];
        let l0_l1 = clause.mask_variable(0b0011);
        let l2_l3 = clause.mask_variable(0b1100);
        let l0_l2_l3 = clause.mask_variable(0b1101);
        assert!(!big.has_implication(positive(l0_l1), positive(16)));
        assert!(big.has_implication(positive(l2_l3), positive(16)));
        assert!(
            big.has_implication(positive(l0_l2_l3), positive(16)),
            "a non-empty popcount-2 sibling must not be shadowed by an earlier empty one at the same level"
        );
    }
}
