//! Crate `bitseq` provides the sorted-sequence primitives component A
//! calls for. Every sequence here is a `Vec<i32>` that is, by contract,
//! strictly ascending and duplicate-free once `sort_dedupe` has been run
//! on it; callers that batch-insert are responsible for restoring that
//! invariant before anyone else reads the sequence, exactly like the
//! teacher's own `VarIdHeap` keeps its heap invariant internal to a
//! handful of functions instead of re-checking it everywhere.

/// Merge `other` into `seq`, preserving ascending order and dropping
/// duplicates. Allocation-free beyond the vector's own amortized growth.
pub fn union_in_place(seq: &mut Vec<i32>, other: &[i32]) {
    if other.is_empty() {
        return;
    }
    let mut merged = Vec::with_capacity(seq.len() + other.len());
    let (mut i, mut j) = (0, 0);
    while i < seq.len() && j < other.len() {
        match seq[i].cmp(&other[j]) {
            std::cmp::Ordering::Less => {
                merged.push(seq[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(other[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(seq[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&seq[i..]);
    merged.extend_from_slice(&other[j..]);
    *seq = merged;
}

/// Functional union of two sorted, duplicate-free sequences.
pub fn union(a: &[i32], b: &[i32]) -> Vec<i32> {
    let mut out = a.to_vec();
    union_in_place(&mut out, b);
    out
}

/// Functional intersection of two sorted, duplicate-free sequences.
pub fn intersection(a: &[i32], b: &[i32]) -> Vec<i32> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Functional set difference `a \ b`.
pub fn difference(a: &[i32], b: &[i32]) -> Vec<i32> {
    let mut out = Vec::with_capacity(a.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() {
        if j >= b.len() || a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if a[i] == b[j] {
            i += 1;
            j += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// In-place set difference: removes every element of `seq` that also
/// appears in `filter`, and optionally appends every removed element to
/// `removed` (preserving ascending order there too).
pub fn filter_out(seq: &mut Vec<i32>, filter: &[i32], mut removed: Option<&mut Vec<i32>>) {
    if filter.is_empty() {
        return;
    }
    let mut kept = Vec::with_capacity(seq.len());
    let (mut i, mut j) = (0, 0);
    while i < seq.len() {
        if j < filter.len() && seq[i] == filter[j] {
            if let Some(r) = removed.as_deref_mut() {
                r.push(seq[i]);
            }
            i += 1;
            j += 1;
        } else if j < filter.len() && filter[j] < seq[i] {
            j += 1;
        } else {
            kept.push(seq[i]);
            i += 1;
        }
    }
    *seq = kept;
}

/// Inserts `value` preserving ascending order; no-op if already present.
/// Returns `true` if the sequence changed.
pub fn insert(seq: &mut Vec<i32>, value: i32) -> bool {
    match seq.binary_search(&value) {
        Ok(_) => false,
        Err(pos) => {
            seq.insert(pos, value);
            true
        }
    }
}

/// Removes `value` if present. Returns `true` if the sequence changed.
pub fn delete(seq: &mut Vec<i32>, value: i32) -> bool {
    match seq.binary_search(&value) {
        Ok(pos) => {
            seq.remove(pos);
            true
        }
        Err(_) => false,
    }
}

/// `true` iff the two sorted sequences share at least one element.
/// Two-pointer scan that exits on the first match instead of computing
/// the full intersection.
pub fn intersects(a: &[i32], b: &[i32]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}

/// Appends `extra` to `seq`, then sorts and dedupes the whole thing.
/// The caller makes no claim that `extra` was sorted or disjoint; this
/// is the fallback for whoever can't maintain sortedness by construction.
pub fn extend_then_sort_dedupe(seq: &mut Vec<i32>, extra: &[i32]) {
    seq.extend_from_slice(extra);
    sort_dedupe(seq);
}

/// Restores the ascending, duplicate-free invariant on an arbitrary
/// sequence, the operation `ImplicationTable::sort_graph` runs per dirty
/// adjacency.
pub fn sort_dedupe(seq: &mut Vec<i32>) {
    seq.sort_unstable();
    seq.dedup();
}

/// `true` iff `seq` is already ascending and duplicate-free.
pub fn is_sorted_unique(seq: &[i32]) -> bool {
    seq.windows(2).all(|w| w[0] < w[1])
}
