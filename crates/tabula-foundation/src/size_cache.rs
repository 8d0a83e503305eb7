//! Measured sizes of rows and supplements, keyed by position.

use tabula_core::collections::map::HashMap;
use tabula_core::{IndexPath, ReuseIdentifier, Size, Supplement};

use crate::diff::SectionedChangeset;

#[derive(Clone, Debug, Default)]
struct SectionSizes {
    rows: Vec<Option<Size>>,
    supplements: HashMap<Supplement, Size>,
}

impl SectionSizes {
    fn empty(row_count: usize) -> Self {
        Self {
            rows: vec![None; row_count],
            supplements: HashMap::default(),
        }
    }
}

/// Running average of the sizes measured for one component type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeEstimate {
    pub average: Size,
    pub samples: usize,
}

impl SizeEstimate {
    fn record(&mut self, size: Size) {
        let samples = self.samples as f32;
        let next = samples + 1.0;
        self.average = Size::new(
            (self.average.width * samples + size.width) / next,
            (self.average.height * samples + size.height) / next,
        );
        self.samples += 1;
    }
}

/// Cache of measured sizes mirroring the shape of the current snapshot.
///
/// Positions outside the tracked shape read as uncached and ignore writes.
#[derive(Clone, Debug, Default)]
pub struct SizeCache {
    sections: Vec<SectionSizes>,
    estimates: HashMap<ReuseIdentifier, SizeEstimate>,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached size and tracks the given shape. Per-type
    /// estimates survive.
    pub fn reset(&mut self, row_counts: impl IntoIterator<Item = usize>) {
        self.sections = row_counts.into_iter().map(SectionSizes::empty).collect();
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn row_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |sizes| sizes.rows.len())
    }

    pub fn row(&self, path: IndexPath) -> Option<Size> {
        self.sections
            .get(path.section)?
            .rows
            .get(path.row)
            .copied()
            .flatten()
    }

    pub fn store_row(&mut self, path: IndexPath, size: Size, reuse_identifier: ReuseIdentifier) {
        let Some(slot) = self
            .sections
            .get_mut(path.section)
            .and_then(|sizes| sizes.rows.get_mut(path.row))
        else {
            log::warn!("size cache has no row at {path}, dropping measurement");
            return;
        };
        *slot = Some(size);
        self.estimates.entry(reuse_identifier).or_default().record(size);
    }

    pub fn supplement(&self, section: usize, supplement: &Supplement) -> Option<Size> {
        self.sections
            .get(section)?
            .supplements
            .get(supplement)
            .copied()
    }

    pub fn store_supplement(
        &mut self,
        section: usize,
        supplement: Supplement,
        size: Size,
        reuse_identifier: ReuseIdentifier,
    ) {
        let Some(sizes) = self.sections.get_mut(section) else {
            log::warn!("size cache has no section {section}, dropping measurement");
            return;
        };
        sizes.supplements.insert(supplement, size);
        self.estimates.entry(reuse_identifier).or_default().record(size);
    }

    /// Average measured size of components with the given reuse identifier.
    pub fn estimate(&self, reuse_identifier: &ReuseIdentifier) -> Option<Size> {
        self.estimates
            .get(reuse_identifier)
            .filter(|estimate| estimate.samples > 0)
            .map(|estimate| estimate.average)
    }

    pub fn invalidate_row(&mut self, path: IndexPath) {
        if let Some(slot) = self
            .sections
            .get_mut(path.section)
            .and_then(|sizes| sizes.rows.get_mut(path.row))
        {
            *slot = None;
        }
    }

    pub fn invalidate_supplement(&mut self, section: usize, supplement: &Supplement) {
        if let Some(sizes) = self.sections.get_mut(section) {
            sizes.supplements.remove(supplement);
        }
    }

    /// Forgets the row at `path`, shifting later rows of its section up.
    pub fn remove_row(&mut self, path: IndexPath) {
        if let Some(sizes) = self.sections.get_mut(path.section) {
            if path.row < sizes.rows.len() {
                sizes.rows.remove(path.row);
            }
        }
    }

    /// Carries cached sizes along an applied update.
    ///
    /// Sizes follow their rows and sections to their new positions. Inserted
    /// positions, changed rows and changed supplements become uncached.
    /// `new_row_counts` gives the row count of every section after the
    /// update.
    ///
    /// # Panics
    /// If `changeset` was not computed against the shape this cache tracks.
    pub fn apply(&mut self, changeset: &SectionedChangeset, new_row_counts: &[usize]) {
        let section_sources = changeset.sections.destination_sources(self.sections.len());
        assert_eq!(
            section_sources.len(),
            new_row_counts.len(),
            "size cache remapped to a snapshot of a different shape"
        );

        let mut old = std::mem::take(&mut self.sections);
        let mut sections = Vec::with_capacity(new_row_counts.len());
        for (destination, source) in section_sources.into_iter().enumerate() {
            let row_count = new_row_counts[destination];
            let Some(source) = source else {
                sections.push(SectionSizes::empty(row_count));
                continue;
            };

            let previous = std::mem::take(&mut old[source]);
            let mut rows = match changeset.rows_for_destination(destination) {
                Some(rows) => {
                    let mut remapped: Vec<Option<Size>> = rows
                        .destination_sources(previous.rows.len())
                        .into_iter()
                        .map(|source| source.and_then(|source| previous.rows[source]))
                        .collect();
                    for mutated in rows.mutated_destinations() {
                        remapped[mutated] = None;
                    }
                    remapped
                }
                None => previous.rows,
            };
            rows.resize(row_count, None);

            let mut supplements = previous.supplements;
            if let Some(changes) = changeset.supplements_for_destination(destination) {
                for supplement in &changes.changed {
                    supplements.remove(supplement);
                }
            }

            sections.push(SectionSizes { rows, supplements });
        }
        self.sections = sections;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Changeset;

    struct Tall;
    struct Short;

    fn path(section: usize, row: usize) -> IndexPath {
        IndexPath::new(section, row)
    }

    #[test]
    fn test_store_and_read() {
        let mut cache = SizeCache::new();
        cache.reset([2, 1]);
        cache.store_row(path(0, 1), Size::new(320.0, 44.0), ReuseIdentifier::of::<Tall>());

        assert_eq!(cache.row(path(0, 1)), Some(Size::new(320.0, 44.0)));
        assert_eq!(cache.row(path(0, 0)), None);
        assert_eq!(cache.row(path(3, 0)), None);
    }

    #[test]
    fn test_out_of_shape_writes_are_ignored() {
        let mut cache = SizeCache::new();
        cache.reset([1]);
        cache.store_row(path(0, 5), Size::new(1.0, 1.0), ReuseIdentifier::of::<Tall>());
        cache.store_supplement(4, Supplement::Header, Size::new(1.0, 1.0), ReuseIdentifier::of::<Tall>());

        assert_eq!(cache.row_count(0), 1);
        assert_eq!(cache.section_count(), 1);
    }

    #[test]
    fn test_estimate_is_running_average_per_type() {
        let mut cache = SizeCache::new();
        cache.reset([3]);
        cache.store_row(path(0, 0), Size::new(100.0, 40.0), ReuseIdentifier::of::<Tall>());
        cache.store_row(path(0, 1), Size::new(100.0, 60.0), ReuseIdentifier::of::<Tall>());
        cache.store_row(path(0, 2), Size::new(100.0, 10.0), ReuseIdentifier::of::<Short>());

        assert_eq!(cache.estimate(&ReuseIdentifier::of::<Tall>()), Some(Size::new(100.0, 50.0)));
        assert_eq!(cache.estimate(&ReuseIdentifier::of::<Short>()), Some(Size::new(100.0, 10.0)));

        cache.reset([0]);
        assert_eq!(cache.estimate(&ReuseIdentifier::of::<Tall>()), Some(Size::new(100.0, 50.0)));
    }

    #[test]
    fn test_remove_row_shifts_following_rows() {
        let mut cache = SizeCache::new();
        cache.reset([3]);
        cache.store_row(path(0, 2), Size::new(1.0, 30.0), ReuseIdentifier::of::<Tall>());
        cache.remove_row(path(0, 0));

        assert_eq!(cache.row_count(0), 2);
        assert_eq!(cache.row(path(0, 1)), Some(Size::new(1.0, 30.0)));
    }

    #[test]
    fn test_apply_moves_sizes_with_rows_and_drops_changed() {
        let mut cache = SizeCache::new();
        cache.reset([3]);
        for row in 0..3 {
            let height = 10.0 * (row + 1) as f32;
            cache.store_row(path(0, row), Size::new(1.0, height), ReuseIdentifier::of::<Tall>());
        }
        cache.store_supplement(0, Supplement::Header, Size::new(1.0, 5.0), ReuseIdentifier::of::<Short>());

        // [a, b, c] -> [c, a, b'] with the header unchanged.
        let rows = Changeset::diff_by(
            &[("a", 0), ("b", 0), ("c", 0)],
            &[("c", 0), ("a", 0), ("b", 1)],
            |item| &item.0,
            |x, y| x.1 == y.1,
        );
        let changeset = SectionedChangeset {
            sections: Changeset::default(),
            rows: vec![crate::diff::RowChanges {
                source_section: 0,
                destination_section: 0,
                changeset: rows,
            }],
            supplements: Vec::new(),
        };
        cache.apply(&changeset, &[3]);

        assert_eq!(cache.row(path(0, 0)), Some(Size::new(1.0, 30.0)));
        assert_eq!(cache.row(path(0, 1)), Some(Size::new(1.0, 10.0)));
        assert_eq!(cache.row(path(0, 2)), None);
        assert_eq!(cache.supplement(0, &Supplement::Header), Some(Size::new(1.0, 5.0)));
    }

    #[test]
    fn test_apply_follows_section_moves_and_clears_inserted() {
        let mut cache = SizeCache::new();
        cache.reset([1, 1]);
        cache.store_row(path(0, 0), Size::new(1.0, 11.0), ReuseIdentifier::of::<Tall>());
        cache.store_row(path(1, 0), Size::new(1.0, 22.0), ReuseIdentifier::of::<Tall>());

        // [X, Y] -> [Z, Y, X]
        let sections = Changeset::diff_by(&["X", "Y"], &["Z", "Y", "X"], |id| id, |_, _| true);
        let changeset = SectionedChangeset {
            sections,
            rows: Vec::new(),
            supplements: Vec::new(),
        };
        cache.apply(&changeset, &[4, 1, 1]);

        assert_eq!(cache.row_count(0), 4);
        assert_eq!(cache.row(path(0, 0)), None);
        assert_eq!(cache.row(path(1, 0)), Some(Size::new(1.0, 22.0)));
        assert_eq!(cache.row(path(2, 0)), Some(Size::new(1.0, 11.0)));
    }
}
