//! Crate `literal` implements the signed-literal algebra spec.md 4.C
//! builds everything else on: a variable is a non-negative integer, and a
//! literal is that integer (positive polarity) or its bitwise complement
//! (negative polarity). Complementing twice is a no-op and complementing
//! never needs a branch, which is why the BIG and the propagator both
//! store raw `Literal`s instead of a `(Variable, bool)` pair.

/// A 1-based problem variable. Matches the teacher's own `VarId = u32`
/// convention of keeping variable ids disjoint from the literal encoding
/// that wraps them.
pub type Variable = i32;

/// A signed literal: `v` for the positive occurrence of variable `v`,
/// `!v` for its negation. Callers should not construct literals from a
/// variable with anything other than [`positive`]/[`negative`].
pub type Literal = i32;

/// The positive literal for `var`.
pub fn positive(var: Variable) -> Literal {
    debug_assert!(var >= 0);
    var
}

/// The negative literal for `var`.
pub fn negative(var: Variable) -> Literal {
    debug_assert!(var >= 0);
    !var
}

/// Flips polarity. `negate(negate(l)) == l` for every `l`.
pub fn negate(lit: Literal) -> Literal {
    !lit
}

/// `true` for the positive occurrence of a variable.
pub fn is_positive(lit: Literal) -> bool {
    lit >= 0
}

/// Recovers the variable a literal was built from, independent of
/// polarity.
pub fn to_variable(lit: Literal) -> Variable {
    if lit < 0 {
        !lit
    } else {
        lit
    }
}

/// Index into a 4-entry, polarity-keyed table (`[negneg, negpos, posneg,
/// pospos]`, the ordering spec.md 4.D names) for the pair `(a, b)`.
pub fn polarity_index(a: Literal, b: Literal) -> usize {
    (is_positive(a) as usize) * 2 + (is_positive(b) as usize)
}

/// Index of the contrapositive entry: `(!b, !a)` lands at `3 - idx`
/// because flipping both polarities flips both bits of the 2-bit index.
pub fn contrapositive_index(idx: usize) -> usize {
    debug_assert!(idx < 4);
    3 - idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negate_is_an_involution() {
        for v in 0..8 {
            let p = positive(v);
            let n = negative(v);
            assert_eq!(negate(p), n);
            assert_eq!(negate(n), p);
            assert_eq!(negate(negate(p)), p);
        }
    }

    #[test]
    fn to_variable_ignores_polarity() {
        for v in 0..8 {
            assert_eq!(to_variable(positive(v)), v);
            assert_eq!(to_variable(negative(v)), v);
        }
    }

    #[test]
    fn is_positive_matches_construction() {
        assert!(is_positive(positive(3)));
        assert!(!is_positive(negative(3)));
    }

    #[test]
    fn polarity_index_covers_all_four_quadrants() {
        let p = positive(1);
        let n = negative(1);
        assert_eq!(polarity_index(n, n), 0);
        assert_eq!(polarity_index(n, p), 1);
        assert_eq!(polarity_index(p, n), 2);
        assert_eq!(polarity_index(p, p), 3);
    }

    #[test]
    fn contrapositive_index_is_involutive() {
        for idx in 0..4 {
            let c = contrapositive_index(idx);
            assert_eq!(contrapositive_index(c), idx);
        }
    }
}
