//! Flat edit scripts over one ordered collection.

use std::fmt;
use std::hash::Hash;

use super::alignment::align;

/// A matched element whose relative order changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub source: usize,
    pub destination: usize,
    /// Whether the content also changed.
    pub is_mutated: bool,
}

/// A matched element that kept its relative order but whose content changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mutation {
    pub source: usize,
    pub destination: usize,
}

/// Edit script turning an old collection into a new one.
///
/// Removal and move sources index the old collection; insert and move
/// destinations index the new one. Elements that are neither removed nor
/// moved keep their relative order and fill the remaining destinations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changeset {
    pub inserts: Vec<usize>,
    pub removals: Vec<usize>,
    pub moves: Vec<Move>,
    pub mutations: Vec<Mutation>,
}

impl Changeset {
    /// Diffs two collections, matching elements by `key` and classifying
    /// matched pairs as unchanged or mutated with `is_equal`.
    pub fn diff_by<T, K, FK, FE>(old: &[T], new: &[T], key: FK, is_equal: FE) -> Self
    where
        K: Hash + Eq,
        FK: Fn(&T) -> &K,
        FE: Fn(&T, &T) -> bool,
    {
        let old_keys: Vec<&K> = old.iter().map(&key).collect();
        let new_keys: Vec<&K> = new.iter().map(&key).collect();
        let alignment = align(&old_keys, &new_keys);

        let moves = alignment
            .moves
            .iter()
            .map(|&(source, destination)| Move {
                source,
                destination,
                is_mutated: !is_equal(&old[source], &new[destination]),
            })
            .collect();

        let mutations = alignment
            .stationary
            .iter()
            .filter(|&&(source, destination)| !is_equal(&old[source], &new[destination]))
            .map(|&(source, destination)| Mutation {
                source,
                destination,
            })
            .collect();

        Self {
            inserts: alignment.inserts,
            removals: alignment.removals,
            moves,
            mutations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
            && self.removals.is_empty()
            && self.moves.is_empty()
            && self.mutations.is_empty()
    }

    /// Number of individual edits.
    pub fn len(&self) -> usize {
        self.inserts.len() + self.removals.len() + self.moves.len() + self.mutations.len()
    }

    /// Length of the new collection given the length of the old one.
    pub fn new_len(&self, old_len: usize) -> usize {
        (old_len + self.inserts.len()).saturating_sub(self.removals.len())
    }

    /// Destinations whose content changed, whether or not they moved.
    pub fn mutated_destinations(&self) -> impl Iterator<Item = usize> + '_ {
        self.mutations
            .iter()
            .map(|mutation| mutation.destination)
            .chain(
                self.moves
                    .iter()
                    .filter(|movement| movement.is_mutated)
                    .map(|movement| movement.destination),
            )
    }

    /// For every destination, the source it came from, or `None` if inserted.
    ///
    /// # Panics
    /// If the changeset does not describe a valid update of `old_len` elements.
    pub fn destination_sources(&self, old_len: usize) -> Vec<Option<usize>> {
        let moves = self
            .moves
            .iter()
            .map(|movement| (movement.source, movement.destination));
        match resolve_destinations(old_len, &self.removals, &self.inserts, moves) {
            Ok(sources) => sources,
            Err(err) => panic!("inconsistent changeset: {err}"),
        }
    }
}

/// Reason a batch of edits cannot be applied to a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidUpdate {
    RemovalOutOfBounds { index: usize, len: usize },
    InsertOutOfBounds { index: usize, len: usize },
    MoveOutOfBounds { source: usize, destination: usize },
    DuplicateSource(usize),
    DuplicateDestination(usize),
    /// More removals than elements.
    Underflow { old_len: usize, removals: usize },
}

impl fmt::Display for InvalidUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidUpdate::RemovalOutOfBounds { index, len } => {
                write!(f, "removal at {index} beyond old length {len}")
            }
            InvalidUpdate::InsertOutOfBounds { index, len } => {
                write!(f, "insert at {index} beyond new length {len}")
            }
            InvalidUpdate::MoveOutOfBounds {
                source,
                destination,
            } => write!(f, "move {source} -> {destination} out of bounds"),
            InvalidUpdate::DuplicateSource(index) => {
                write!(f, "old index {index} is removed or moved twice")
            }
            InvalidUpdate::DuplicateDestination(index) => {
                write!(f, "new index {index} is inserted or moved into twice")
            }
            InvalidUpdate::Underflow { old_len, removals } => {
                write!(f, "{removals} removals from {old_len} elements")
            }
        }
    }
}

impl std::error::Error for InvalidUpdate {}

/// Resolves where every element of the new collection comes from.
///
/// Works from raw edit lists, so it also serves hosts that replay batch
/// operations. Elements that are neither removed nor moved fill the
/// remaining destinations in their old order.
pub fn resolve_destinations(
    old_len: usize,
    removals: &[usize],
    inserts: &[usize],
    moves: impl IntoIterator<Item = (usize, usize)>,
) -> Result<Vec<Option<usize>>, InvalidUpdate> {
    let new_len = (old_len + inserts.len())
        .checked_sub(removals.len())
        .ok_or(InvalidUpdate::Underflow {
            old_len,
            removals: removals.len(),
        })?;

    let mut consumed = vec![false; old_len];
    let mut filled = vec![false; new_len];
    let mut sources: Vec<Option<usize>> = vec![None; new_len];

    for &index in removals {
        if index >= old_len {
            return Err(InvalidUpdate::RemovalOutOfBounds {
                index,
                len: old_len,
            });
        }
        if std::mem::replace(&mut consumed[index], true) {
            return Err(InvalidUpdate::DuplicateSource(index));
        }
    }
    for &index in inserts {
        if index >= new_len {
            return Err(InvalidUpdate::InsertOutOfBounds {
                index,
                len: new_len,
            });
        }
        if std::mem::replace(&mut filled[index], true) {
            return Err(InvalidUpdate::DuplicateDestination(index));
        }
    }
    for (source, destination) in moves {
        if source >= old_len || destination >= new_len {
            return Err(InvalidUpdate::MoveOutOfBounds {
                source,
                destination,
            });
        }
        if std::mem::replace(&mut consumed[source], true) {
            return Err(InvalidUpdate::DuplicateSource(source));
        }
        if std::mem::replace(&mut filled[destination], true) {
            return Err(InvalidUpdate::DuplicateDestination(destination));
        }
        sources[destination] = Some(source);
    }

    let mut remaining = (0..old_len).filter(|&index| !consumed[index]);
    for destination in 0..new_len {
        if !filled[destination] {
            // Counts balance, so a stationary element is always left here.
            sources[destination] = remaining.next();
        }
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: u32,
        value: &'static str,
    }

    fn items(pairs: &[(u32, &'static str)]) -> Vec<Item> {
        pairs
            .iter()
            .map(|&(id, value)| Item { id, value })
            .collect()
    }

    fn diff(old: &[Item], new: &[Item]) -> Changeset {
        Changeset::diff_by(old, new, |item| &item.id, |a, b| a.value == b.value)
    }

    /// Replays a changeset against `old` the way a list view would.
    fn replay(old: &[Item], new: &[Item], changeset: &Changeset) -> Vec<u32> {
        changeset
            .destination_sources(old.len())
            .into_iter()
            .enumerate()
            .map(|(destination, source)| match source {
                Some(source) => old[source].id,
                None => new[destination].id,
            })
            .collect()
    }

    #[test]
    fn test_diff_against_itself_is_empty() {
        let old = items(&[(1, "a"), (2, "b")]);
        assert!(diff(&old, &old).is_empty());
    }

    #[test]
    fn test_changed_content_is_a_mutation_not_a_replacement() {
        let old = items(&[(1, "a"), (2, "b")]);
        let new = items(&[(1, "a"), (2, "B")]);
        let changeset = diff(&old, &new);
        assert!(changeset.inserts.is_empty());
        assert!(changeset.removals.is_empty());
        assert_eq!(
            changeset.mutations,
            vec![Mutation {
                source: 1,
                destination: 1
            }]
        );
    }

    #[test]
    fn test_moved_and_changed_is_flagged_on_the_move() {
        let old = items(&[(1, "a"), (2, "b")]);
        let new = items(&[(2, "B"), (1, "a")]);
        let changeset = diff(&old, &new);
        assert_eq!(
            changeset.moves,
            vec![Move {
                source: 1,
                destination: 0,
                is_mutated: true
            }]
        );
        assert_eq!(changeset.mutated_destinations().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_replaying_reproduces_new_order() {
        let old = items(&[(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")]);
        let new = items(&[(6, "f"), (4, "d"), (1, "a"), (3, "C"), (7, "g")]);
        let changeset = diff(&old, &new);
        assert_eq!(changeset.new_len(old.len()), new.len());
        assert_eq!(replay(&old, &new, &changeset), vec![6, 4, 1, 3, 7]);
    }

    #[test]
    fn test_resolve_rejects_unbalanced_updates() {
        assert_eq!(
            resolve_destinations(2, &[0, 1, 1], &[], std::iter::empty()),
            Err(InvalidUpdate::Underflow {
                old_len: 2,
                removals: 3
            })
        );
        assert_eq!(
            resolve_destinations(2, &[], &[3], std::iter::empty()),
            Err(InvalidUpdate::InsertOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(
            resolve_destinations(2, &[0], &[0], [(0, 1)]),
            Err(InvalidUpdate::DuplicateSource(0))
        );
    }

    #[test]
    fn test_resolve_fills_stationary_slots_in_order() {
        let sources = resolve_destinations(4, &[1], &[0], [(3, 1)]).unwrap();
        assert_eq!(sources, vec![None, Some(3), Some(0), Some(2)]);
    }
}
