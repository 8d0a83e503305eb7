//! Snapshot and size bookkeeping behind the adapter.

use std::hash::Hash;

use tabula_core::{
    AnyRenderable, Axis, EdgeInsets, IndexPath, Node, Section, Size, SizeConstraint, Supplement,
};
use tabula_foundation::{SectionedChangeset, SizeCache};

/// Result of a size query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeLookup {
    /// Nothing measured or estimated yet; the host default applies.
    NoCachedResult,
    /// The queried supplement is absent from the section.
    DoesNotExist,
    Size(Size),
}

impl SizeLookup {
    pub fn size(self) -> Option<Size> {
        match self {
            SizeLookup::Size(size) => Some(size),
            SizeLookup::NoCachedResult | SizeLookup::DoesNotExist => None,
        }
    }
}

/// What measurement is allowed to use for one query.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MeasureContext {
    pub bounds: Size,
    pub margins: EdgeInsets,
    pub allow_estimation: bool,
}

/// The last applied snapshot and the sizes measured against it.
pub(crate) struct AdapterStore<S, R> {
    sections: Vec<Section<S, R>>,
    sizes: SizeCache,
    axis: Axis,
    known_supplements: Vec<Supplement>,
    estimates_sizes: bool,
}

impl<S, R> AdapterStore<S, R>
where
    S: Hash + Eq,
    R: Hash + Eq,
{
    pub fn new(axis: Axis, known_supplements: Vec<Supplement>, estimates_sizes: bool) -> Self {
        Self {
            sections: Vec::new(),
            sizes: SizeCache::new(),
            axis,
            known_supplements,
            estimates_sizes,
        }
    }

    pub fn sections(&self) -> &[Section<S, R>] {
        &self.sections
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Replaces the snapshot and forgets every cached size.
    pub fn replace(&mut self, sections: Vec<Section<S, R>>) {
        self.sizes.reset(sections.iter().map(Section::len));
        self.sections = sections;
    }

    /// Replaces the snapshot, carrying cached sizes through `changeset`.
    pub fn update(&mut self, sections: Vec<Section<S, R>>, changeset: &SectionedChangeset) {
        let row_counts: Vec<usize> = sections.iter().map(Section::len).collect();
        self.sizes.apply(changeset, &row_counts);
        self.sections = sections;
    }

    pub fn section(&self, index: usize) -> &Section<S, R> {
        match self.sections.get(index) {
            Some(section) => section,
            None => panic!(
                "section {index} out of range for {} sections",
                self.sections.len()
            ),
        }
    }

    pub fn node(&self, path: IndexPath) -> &Node<R> {
        let section = self.section(path.section);
        match section.rows.get(path.row) {
            Some(node) => node,
            None => panic!(
                "row {path} out of range for a section of {} rows",
                section.rows.len()
            ),
        }
    }

    pub fn remove_row(&mut self, path: IndexPath) -> Node<R> {
        let len = self.section(path.section).rows.len();
        assert!(
            path.row < len,
            "row {path} out of range for a section of {len} rows"
        );
        self.sizes.remove_row(path);
        self.sections[path.section].rows.remove(path.row)
    }

    /// The supplement component if the section has it and the adapter
    /// handles that supplement.
    pub fn supplement(&self, section: usize, supplement: &Supplement) -> Option<&AnyRenderable> {
        if !self.known_supplements.contains(supplement) {
            return None;
        }
        self.section(section).supplement(supplement)
    }

    pub fn row_size(&mut self, path: IndexPath, context: MeasureContext) -> SizeLookup {
        if let Some(size) = self.sizes.row(path) {
            return SizeLookup::Size(size);
        }
        let component = self.node(path).component.clone();
        self.measure(component, context, |sizes, size, component| {
            sizes.store_row(path, size, component.reuse_identifier());
        })
    }

    pub fn supplement_size(
        &mut self,
        section: usize,
        supplement: &Supplement,
        context: MeasureContext,
    ) -> SizeLookup {
        let Some(component) = self.supplement(section, supplement).cloned() else {
            return SizeLookup::DoesNotExist;
        };
        if let Some(size) = self.sizes.supplement(section, supplement) {
            return SizeLookup::Size(size);
        }
        self.measure(component, context, |sizes, size, component| {
            sizes.store_supplement(section, supplement.clone(), size, component.reuse_identifier());
        })
    }

    pub fn invalidate_row(&mut self, path: IndexPath) {
        self.sizes.invalidate_row(path);
    }

    pub fn invalidate_supplement(&mut self, section: usize, supplement: &Supplement) {
        self.sizes.invalidate_supplement(section, supplement);
    }

    // Estimated queries never measure. Exact ones need a non-empty extent
    // across the scroll axis to bind the component to.
    fn measure(
        &mut self,
        component: AnyRenderable,
        context: MeasureContext,
        store: impl FnOnce(&mut SizeCache, Size, &AnyRenderable),
    ) -> SizeLookup {
        if context.allow_estimation {
            let estimate = self
                .estimates_sizes
                .then(|| self.sizes.estimate(&component.reuse_identifier()))
                .flatten();
            return estimate.map_or(SizeLookup::NoCachedResult, SizeLookup::Size);
        }

        let cross_extent = match self.axis {
            Axis::Vertical => context.bounds.width,
            Axis::Horizontal => context.bounds.height,
        };
        if cross_extent <= 0.0 {
            return SizeLookup::NoCachedResult;
        }

        let constraint = SizeConstraint::for_axis(self.axis, context.bounds);
        let size = component.size_bound_to(constraint, context.margins);
        store(&mut self.sizes, size, &component);
        SizeLookup::Size(size)
    }
}
