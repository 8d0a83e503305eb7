//! Two-level diff over forms: sections, then rows within matched sections,
//! plus supplements of matched sections.

use std::hash::Hash;

use smallvec::SmallVec;
use tabula_core::{Section, Supplement};

use super::changeset::Changeset;

/// Row edits of one section present in both snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowChanges {
    pub source_section: usize,
    pub destination_section: usize,
    pub changeset: Changeset,
}

/// Supplements of a matched section that were added, removed or changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupplementChanges {
    pub source_section: usize,
    pub destination_section: usize,
    pub changed: SmallVec<[Supplement; 2]>,
}

/// The complete edit script between two forms.
///
/// Section-level mutations (and mutated section moves) are exactly the
/// matched sections listed in `supplements`. Row edits are only reported for
/// matched sections; a row that changes section is a removal plus an insert.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionedChangeset {
    pub sections: Changeset,
    /// Ascending by destination section.
    pub rows: Vec<RowChanges>,
    /// Ascending by destination section.
    pub supplements: Vec<SupplementChanges>,
}

impl SectionedChangeset {
    pub fn diff<S, R>(old: &[Section<S, R>], new: &[Section<S, R>]) -> Self
    where
        S: Hash + Eq,
        R: Hash + Eq,
    {
        let sections = Changeset::diff_by(
            old,
            new,
            |section| &section.id,
            |a, b| changed_supplements(a, b).is_empty(),
        );

        let pairs = new_to_old_pairs(&sections, old.len());

        let mut rows = Vec::new();
        let mut supplements = Vec::new();
        for (source, destination) in pairs {
            let (before, after) = (&old[source], &new[destination]);

            let changeset = Changeset::diff_by(
                &before.rows,
                &after.rows,
                |node| &node.id,
                |a, b| a.component == b.component,
            );
            if !changeset.is_empty() {
                rows.push(RowChanges {
                    source_section: source,
                    destination_section: destination,
                    changeset,
                });
            }

            let changed = changed_supplements(before, after);
            if !changed.is_empty() {
                supplements.push(SupplementChanges {
                    source_section: source,
                    destination_section: destination,
                    changed,
                });
            }
        }

        let changeset = Self {
            sections,
            rows,
            supplements,
        };
        log::trace!(
            "diffed {} -> {} sections: {} section edits, {} row edits, {} supplement changes",
            old.len(),
            new.len(),
            changeset.sections.len(),
            changeset.row_edit_count(),
            changeset.supplements.len()
        );
        changeset
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.rows.is_empty() && self.supplements.is_empty()
    }

    pub fn row_edit_count(&self) -> usize {
        self.rows.iter().map(|changes| changes.changeset.len()).sum()
    }

    /// Row edits of the section that ends up at `destination`.
    pub fn rows_for_destination(&self, destination: usize) -> Option<&Changeset> {
        self.rows
            .binary_search_by_key(&destination, |changes| changes.destination_section)
            .ok()
            .map(|index| &self.rows[index].changeset)
    }

    pub fn supplements_for_destination(&self, destination: usize) -> Option<&SupplementChanges> {
        self.supplements
            .binary_search_by_key(&destination, |changes| changes.destination_section)
            .ok()
            .map(|index| &self.supplements[index])
    }
}

/// `(old, new)` index pairs of every section present in both snapshots,
/// ascending by new index.
fn new_to_old_pairs(sections: &Changeset, old_len: usize) -> Vec<(usize, usize)> {
    sections
        .destination_sources(old_len)
        .into_iter()
        .enumerate()
        .filter_map(|(destination, source)| source.map(|source| (source, destination)))
        .collect()
}

fn changed_supplements<S, R>(
    before: &Section<S, R>,
    after: &Section<S, R>,
) -> SmallVec<[Supplement; 2]> {
    let mut changed: SmallVec<[Supplement; 2]> = SmallVec::new();
    for (supplement, component) in &before.supplements {
        if after.supplements.get(supplement) != Some(component) {
            changed.push(supplement.clone());
        }
    }
    for supplement in after.supplements.keys() {
        if !before.supplements.contains_key(supplement) {
            changed.push(supplement.clone());
        }
    }
    changed
}
