//! Identity alignment of two id sequences.
//!
//! Ids present in both sequences are matched. Among the matched ids, the
//! longest subsequence whose relative order is unchanged (an LCS over unique
//! ids, computed as a longest increasing subsequence of new positions) stays
//! in place; every other matched id is a move. The number of moves is
//! therefore the minimum needed to turn one order into the other.

use std::hash::Hash;

use tabula_core::collections::map::HashMap;

/// Result of aligning an old id sequence with a new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Old indices of ids missing from the new sequence, ascending.
    pub removals: Vec<usize>,
    /// New indices of ids missing from the old sequence, ascending.
    pub inserts: Vec<usize>,
    /// `(old, new)` pairs of matched ids whose relative order changed,
    /// ascending by new index.
    pub moves: Vec<(usize, usize)>,
    /// `(old, new)` pairs of matched ids that keep their relative order,
    /// ascending in both indices.
    pub stationary: Vec<(usize, usize)>,
}

impl Alignment {
    pub fn is_identity(&self) -> bool {
        self.removals.is_empty() && self.inserts.is_empty() && self.moves.is_empty()
    }
}

/// Aligns `old` with `new`. Ids must be unique within each sequence.
pub fn align<T: Hash + Eq>(old: &[T], new: &[T]) -> Alignment {
    let mut alignment = Alignment::default();

    if old.is_empty() || new.is_empty() {
        alignment.removals = (0..old.len()).collect();
        alignment.inserts = (0..new.len()).collect();
        return alignment;
    }

    let new_positions: HashMap<&T, usize> = new
        .iter()
        .enumerate()
        .map(|(index, id)| (id, index))
        .collect();

    let mut common: Vec<(usize, usize)> = Vec::with_capacity(old.len().min(new.len()));
    for (old_index, id) in old.iter().enumerate() {
        match new_positions.get(id) {
            Some(&new_index) => common.push((old_index, new_index)),
            None => alignment.removals.push(old_index),
        }
    }

    let mut matched = vec![false; new.len()];
    for &(_, new_index) in &common {
        matched[new_index] = true;
    }
    alignment.inserts = (0..new.len()).filter(|&index| !matched[index]).collect();

    let targets: Vec<usize> = common.iter().map(|&(_, new_index)| new_index).collect();
    let keep = longest_increasing_subsequence(&targets);
    for (pair, keep) in common.into_iter().zip(keep) {
        if keep {
            alignment.stationary.push(pair);
        } else {
            alignment.moves.push(pair);
        }
    }
    alignment.moves.sort_unstable_by_key(|&(_, new_index)| new_index);

    alignment
}

/// Marks the members of a longest strictly increasing subsequence of `seq`.
///
/// Values are distinct. Among subsequences of equal length the one starting
/// with earlier elements wins, so when two ids swap the earlier one stays put.
fn longest_increasing_subsequence(seq: &[usize]) -> Vec<bool> {
    // Scanning backwards, heads[k] is the position starting the best run of
    // length k + 1 (the one with the largest first value). First values
    // decrease as k grows.
    let mut heads: Vec<usize> = Vec::new();
    let mut next: Vec<Option<usize>> = vec![None; seq.len()];

    for position in (0..seq.len()).rev() {
        let value = seq[position];
        let length = heads.partition_point(|&head| seq[head] > value);
        next[position] = length.checked_sub(1).map(|k| heads[k]);
        if length == heads.len() {
            heads.push(position);
        } else {
            heads[length] = position;
        }
    }

    let mut keep = vec![false; seq.len()];
    let mut cursor = heads.last().copied();
    while let Some(position) = cursor {
        keep[position] = true;
        cursor = next[position];
    }
    keep
}
