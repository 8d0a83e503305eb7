use super::diff::{Move, Mutation};
use super::*;
use std::any::Any;
use tabula_core::{
    NativeView, Node, Renderable, Section, Size, SizeConstraint, Supplement, View,
};

#[derive(Default)]
struct PlainView;

impl View for PlainView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fitting_size(&self, _constraint: SizeConstraint) -> Size {
        Size::new(10.0, 10.0)
    }
}

impl NativeView for PlainView {
    fn generate() -> Self {
        PlainView
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Value(u32);

impl Renderable for Value {
    type View = PlainView;

    fn render(&self, _view: &PlainView) {}
}

type TestSection = Section<&'static str, u32>;

fn section(id: &'static str, rows: &[u32]) -> TestSection {
    Section::with_rows(id, rows.iter().map(|&row| Node::new(row, Value(0))))
}

fn section_with_values(id: &'static str, rows: &[(u32, u32)]) -> TestSection {
    Section::with_rows(
        id,
        rows.iter().map(|&(row, value)| Node::new(row, Value(value))),
    )
}

/// Replays the changeset on `old` like a list view would and returns the
/// resulting row ids per section.
fn replay(old: &[TestSection], new: &[TestSection], changeset: &SectionedChangeset) -> Vec<Vec<u32>> {
    changeset
        .sections
        .destination_sources(old.len())
        .into_iter()
        .enumerate()
        .map(|(destination, source)| {
            let Some(source) = source else {
                return new[destination].rows.iter().map(|node| node.id).collect();
            };
            let before = &old[source].rows;
            match changeset.rows_for_destination(destination) {
                Some(rows) => rows
                    .destination_sources(before.len())
                    .into_iter()
                    .enumerate()
                    .map(|(row, source)| match source {
                        Some(source) => before[source].id,
                        None => new[destination].rows[row].id,
                    })
                    .collect(),
                None => before.iter().map(|node| node.id).collect(),
            }
        })
        .collect()
}

fn row_ids(form: &[TestSection]) -> Vec<Vec<u32>> {
    form.iter()
        .map(|section| section.rows.iter().map(|node| node.id).collect())
        .collect()
}

#[test]
fn test_identical_forms_produce_no_edits() {
    let form = vec![section("A", &[1, 2, 3]), section("B", &[4])];
    assert!(SectionedChangeset::diff(&form, &form).is_empty());
}

#[test]
fn test_section_swap_with_row_edits() {
    let old = vec![section("A", &[1, 2, 3]), section("B", &[4, 5])];
    let new = vec![section("B", &[5, 4, 6]), section("A", &[1, 3])];
    let changeset = SectionedChangeset::diff(&old, &new);

    assert!(changeset.sections.inserts.is_empty());
    assert!(changeset.sections.removals.is_empty());
    assert_eq!(
        changeset.sections.moves,
        vec![Move {
            source: 1,
            destination: 0,
            is_mutated: false
        }]
    );

    let b = changeset.rows_for_destination(0).expect("rows of B changed");
    assert_eq!(
        b.moves,
        vec![Move {
            source: 1,
            destination: 0,
            is_mutated: false
        }]
    );
    assert_eq!(b.inserts, vec![2]);
    assert!(b.removals.is_empty());

    let a = changeset.rows_for_destination(1).expect("rows of A changed");
    assert_eq!(a.removals, vec![1]);
    assert!(a.inserts.is_empty());
    assert!(a.moves.is_empty());

    assert_eq!(replay(&old, &new, &changeset), row_ids(&new));
}

#[test]
fn test_changed_row_value_is_a_single_mutation() {
    let old = vec![section_with_values("S", &[(1, 0), (2, 0)])];
    let new = vec![section_with_values("S", &[(1, 0), (2, 7)])];
    let changeset = SectionedChangeset::diff(&old, &new);

    assert!(changeset.sections.is_empty());
    assert_eq!(changeset.row_edit_count(), 1);
    assert_eq!(
        changeset.rows_for_destination(0).map(|rows| rows.mutations.clone()),
        Some(vec![Mutation {
            source: 1,
            destination: 1
        }])
    );
}

#[test]
fn test_swapping_two_rows_moves_one() {
    let old = vec![section("S", &[1, 2])];
    let new = vec![section("S", &[2, 1])];
    let changeset = SectionedChangeset::diff(&old, &new);

    let rows = changeset.rows_for_destination(0).expect("rows changed");
    assert_eq!(rows.moves.len(), 1);
    assert!(rows.inserts.is_empty() && rows.removals.is_empty());
}

#[test]
fn test_header_change_mutates_section_only() {
    let old = vec![section("S", &[1]).header(Value(1))];
    let new = vec![section("S", &[1]).header(Value(2)).footer(Value(3))];
    let changeset = SectionedChangeset::diff(&old, &new);

    assert_eq!(
        changeset.sections.mutations,
        vec![Mutation {
            source: 0,
            destination: 0
        }]
    );
    assert!(changeset.rows.is_empty());

    let supplements = changeset
        .supplements_for_destination(0)
        .expect("supplements changed");
    assert_eq!(
        supplements.changed.as_slice(),
        &[Supplement::Header, Supplement::Footer]
    );
}

#[test]
fn test_row_crossing_sections_is_removed_and_inserted() {
    let old = vec![section("A", &[1, 2]), section("B", &[3])];
    let new = vec![section("A", &[1]), section("B", &[3, 2])];
    let changeset = SectionedChangeset::diff(&old, &new);

    assert!(changeset.sections.is_empty());
    assert_eq!(changeset.rows_for_destination(0).map(|r| r.removals.clone()), Some(vec![1]));
    assert_eq!(changeset.rows_for_destination(1).map(|r| r.inserts.clone()), Some(vec![1]));
}

#[test]
fn test_removed_and_inserted_sections_carry_no_row_edits() {
    let old = vec![section("A", &[1]), section("B", &[2])];
    let new = vec![section("C", &[5, 6]), section("B", &[2])];
    let changeset = SectionedChangeset::diff(&old, &new);

    assert_eq!(changeset.sections.removals, vec![0]);
    assert_eq!(changeset.sections.inserts, vec![0]);
    assert!(changeset.rows.is_empty());
    assert_eq!(replay(&old, &new, &changeset), row_ids(&new));
}

struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            items.swap(index, self.below(index + 1));
        }
    }
}

const SECTION_IDS: [&str; 6] = ["s0", "s1", "s2", "s3", "s4", "s5"];

fn random_form(rng: &mut XorShift, next_row: &mut u32) -> Vec<TestSection> {
    let mut ids = SECTION_IDS.to_vec();
    rng.shuffle(&mut ids);
    ids.truncate(1 + rng.below(ids.len()));
    ids.into_iter()
        .map(|id| {
            let rows: Vec<(u32, u32)> = (0..rng.below(8))
                .map(|_| {
                    *next_row += 1;
                    (*next_row, rng.below(3) as u32)
                })
                .collect();
            section_with_values(id, &rows)
        })
        .collect()
}

/// Derives a new form from `old` by shuffling, dropping, adding and
/// rewriting rows and sections.
fn perturb(rng: &mut XorShift, old: &[TestSection], next_row: &mut u32) -> Vec<TestSection> {
    let mut form: Vec<TestSection> = old.to_vec();
    rng.shuffle(&mut form);
    if !form.is_empty() && rng.below(3) == 0 {
        form.remove(rng.below(form.len()));
    }
    for section in &mut form {
        rng.shuffle(&mut section.rows);
        if !section.rows.is_empty() && rng.below(2) == 0 {
            section.rows.remove(rng.below(section.rows.len()));
        }
        if rng.below(2) == 0 {
            *next_row += 1;
            let at = rng.below(section.rows.len() + 1);
            section.rows.insert(at, Node::new(*next_row, Value(0)));
        }
        if !section.rows.is_empty() && rng.below(2) == 0 {
            let at = rng.below(section.rows.len());
            let id = section.rows[at].id;
            section.rows[at] = Node::new(id, Value(99));
        }
    }
    if let Some(id) = SECTION_IDS
        .iter()
        .find(|id| !form.iter().any(|section| section.id == **id))
    {
        if rng.below(2) == 0 {
            let at = rng.below(form.len() + 1);
            *next_row += 1;
            form.insert(at, section(*id, &[*next_row]));
        }
    }
    form
}

/// Length of the longest common subsequence, by dynamic programming.
fn lcs_len<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    let mut table = vec![vec![0; new.len() + 1]; old.len() + 1];
    for (i, a) in old.iter().enumerate() {
        for (j, b) in new.iter().enumerate() {
            table[i + 1][j + 1] = if a == b {
                table[i][j] + 1
            } else {
                table[i][j + 1].max(table[i + 1][j])
            };
        }
    }
    table[old.len()][new.len()]
}

/// Moves a minimal edit script needs: every matched id outside a longest
/// common subsequence.
fn minimal_moves<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    let matched = old.iter().filter(|id| new.contains(id)).count();
    matched - lcs_len(old, new)
}

#[test]
fn test_replaying_random_changesets_reproduces_new_form() {
    let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
    let mut next_row = 0;
    for _ in 0..200 {
        let old = random_form(&mut rng, &mut next_row);
        let new = perturb(&mut rng, &old, &mut next_row);
        let changeset = SectionedChangeset::diff(&old, &new);

        assert_eq!(replay(&old, &new, &changeset), row_ids(&new));
        assert_eq!(changeset.sections.new_len(old.len()), new.len());
        assert!(SectionedChangeset::diff(&new, &new).is_empty());

        let old_sections: Vec<_> = old.iter().map(|section| section.id).collect();
        let new_sections: Vec<_> = new.iter().map(|section| section.id).collect();
        assert_eq!(
            changeset.sections.moves.len(),
            minimal_moves(&old_sections, &new_sections)
        );

        for changes in &changeset.rows {
            let before = &old[changes.source_section];
            let after = &new[changes.destination_section];
            let rows = &changes.changeset;
            assert_eq!(rows.new_len(before.rows.len()), after.rows.len());
            let old_rows: Vec<u32> = before.rows.iter().map(|node| node.id).collect();
            let new_rows: Vec<u32> = after.rows.iter().map(|node| node.id).collect();
            assert_eq!(rows.moves.len(), minimal_moves(&old_rows, &new_rows));
            for destination in rows.mutated_destinations() {
                let source = rows.destination_sources(before.rows.len())[destination]
                    .expect("mutated rows exist in both snapshots");
                assert_ne!(before.rows[source].component, after.rows[destination].component);
            }
        }
    }
}
