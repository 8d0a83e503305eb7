//! Drives a [`TableAdapter`] against a [`TestListHost`] the way a native
//! list would, checking every update for consistency.

use std::cell::{Ref, RefCell, RefMut};
use std::hash::Hash;
use std::rc::Rc;

use tabula_core::{IndexPath, Section, Supplement};
use tabula_ui::{
    ContainerCell, HeaderFooterView, ReusableView, TableAdapter, TableAdapterSpec,
    TableViewAnimation,
};

use crate::components::LabelView;
use crate::host::TestListHost;

/// A table adapter wired to a recording host with a scrollable window of
/// visible rows.
pub struct TableHarness<S, R> {
    host: Rc<RefCell<TestListHost>>,
    adapter: TableAdapter<S, R>,
    scroll_offset: usize,
    visible_rows: usize,
}

impl<S, R> Default for TableHarness<S, R>
where
    S: Hash + Eq,
    R: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, R> TableHarness<S, R>
where
    S: Hash + Eq,
    R: Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_host(TestListHost::default(), TableAdapterSpec::default())
    }

    pub fn with_spec(spec: TableAdapterSpec) -> Self {
        Self::with_host(TestListHost::default(), spec)
    }

    pub fn with_host(host: TestListHost, spec: TableAdapterSpec) -> Self {
        let host = Rc::new(RefCell::new(host));
        let mut adapter = TableAdapter::new(spec);
        adapter.attach(&host);
        Self {
            host,
            adapter,
            scroll_offset: 0,
            visible_rows: usize::MAX,
        }
    }

    /// Limits how many rows are on screen at once.
    pub fn visible_rows(mut self, count: usize) -> Self {
        self.visible_rows = count;
        self
    }

    pub fn host(&self) -> Ref<'_, TestListHost> {
        self.host.borrow()
    }

    pub fn host_mut(&self) -> RefMut<'_, TestListHost> {
        self.host.borrow_mut()
    }

    pub fn host_handle(&self) -> Rc<RefCell<TestListHost>> {
        self.host.clone()
    }

    pub fn adapter(&self) -> &TableAdapter<S, R> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut TableAdapter<S, R> {
        &mut self.adapter
    }

    pub fn load(&mut self, sections: Vec<Section<S, R>>) {
        self.adapter.reload(sections);
        self.layout();
    }

    pub fn update(&mut self, sections: Vec<Section<S, R>>, animation: TableViewAnimation) {
        self.adapter.update(sections, animation);
        self.verify();
        self.layout();
    }

    pub fn delete_row(&mut self, path: IndexPath) -> bool {
        let deleted = self.adapter.delete_row(path);
        self.verify();
        self.layout();
        deleted
    }

    pub fn scroll_to(&mut self, offset: usize) {
        self.scroll_offset = offset;
        self.layout();
    }

    /// The on-screen cell at `path`.
    ///
    /// # Panics
    /// If no cell is visible there.
    pub fn cell(&self, path: IndexPath) -> Rc<ContainerCell> {
        match self.host.borrow().visible_cells().get(&path) {
            Some(cell) => cell.clone(),
            None => panic!("no visible cell at {path}"),
        }
    }

    pub fn supplement(&self, section: usize, supplement: &Supplement) -> Option<Rc<HeaderFooterView>> {
        self.host
            .borrow()
            .visible_supplements()
            .get(&(section, supplement.clone()))
            .cloned()
    }

    /// Text shown by the label view in the cell at `path`, if it holds one.
    pub fn label_text(&self, path: IndexPath) -> Option<String> {
        let view = self.cell(path).contained_view()?;
        view.as_any()
            .downcast_ref::<LabelView>()
            .map(LabelView::text)
    }

    /// Texts of every visible label in list order.
    pub fn visible_texts(&self) -> Vec<String> {
        let paths: Vec<IndexPath> = self.host.borrow().visible_cells().keys().copied().collect();
        paths
            .into_iter()
            .filter_map(|path| self.label_text(path))
            .collect()
    }

    fn row_counts(&self) -> Vec<usize> {
        (0..self.adapter.number_of_sections())
            .map(|section| self.adapter.number_of_rows(section))
            .collect()
    }

    /// Checks that the operations the host received account for the
    /// adapter's new row counts, as a native list does after every batch.
    fn verify(&mut self) {
        let expected = self.row_counts();
        let mut host = self.host.borrow_mut();
        if host.needs_reload() {
            host.sync_row_counts(expected);
            return;
        }

        assert!(
            host.failures().is_empty(),
            "invalid batch update: {:?}",
            host.failures()
        );
        let counted = host.row_counts();
        assert_eq!(
            counted.len(),
            expected.len(),
            "list has {} sections after the update, adapter has {}",
            counted.len(),
            expected.len()
        );
        for (section, (counted, expected)) in counted.iter().zip(&expected).enumerate() {
            if let Some(counted) = counted {
                assert_eq!(
                    counted, expected,
                    "list has {counted} rows in section {section} after the update, adapter has {expected}"
                );
            }
        }
        host.sync_row_counts(expected);
    }

    /// Ends display of views that left the screen and fills the visible
    /// window with cells and supplements from the adapter.
    pub fn layout(&mut self) {
        let ended = self.host.borrow_mut().take_ended();
        for (path, cell) in ended.cells {
            self.adapter.did_end_displaying_cell(&cell, path);
            self.adapter.enqueue_reusable_cell(cell);
        }
        for ((section, _), view) in ended.supplements {
            self.adapter.did_end_displaying_supplement(&view, section);
            self.adapter.enqueue_reusable_supplement(view);
        }

        if self.host.borrow().needs_reload() {
            let counts = self.row_counts();
            self.host.borrow_mut().sync_row_counts(counts);
        }

        let (paths, sections) = self.window();

        let hidden: Vec<IndexPath> = self
            .host
            .borrow()
            .visible_cells()
            .keys()
            .filter(|path| !paths.contains(path))
            .copied()
            .collect();
        for path in hidden {
            let cell = self.host.borrow_mut().hide_cell(path);
            if let Some(cell) = cell {
                self.adapter.did_end_displaying_cell(&cell, path);
                self.adapter.enqueue_reusable_cell(cell);
            }
        }

        for path in paths {
            if self.host.borrow().visible_cells().contains_key(&path) {
                continue;
            }
            let cell = self.adapter.cell_for_row(&*self.host.borrow(), path);
            self.adapter.will_display_cell(&cell, path);
            self.host.borrow_mut().show_cell(path, cell);
        }

        let wanted: Vec<(usize, Supplement)> = sections
            .iter()
            .flat_map(|&section| {
                self.adapter.sections()[section]
                    .supplements
                    .keys()
                    .map(move |supplement| (section, supplement.clone()))
            })
            .collect();

        let stale: Vec<(usize, Supplement)> = self
            .host
            .borrow()
            .visible_supplements()
            .keys()
            .filter(|key| !wanted.contains(key))
            .cloned()
            .collect();
        for (section, supplement) in stale {
            let view = self.host.borrow_mut().hide_supplement(section, &supplement);
            if let Some(view) = view {
                self.adapter.did_end_displaying_supplement(&view, section);
                self.adapter.enqueue_reusable_supplement(view);
            }
        }

        for (section, supplement) in wanted {
            if self
                .host
                .borrow()
                .visible_supplements()
                .contains_key(&(section, supplement.clone()))
            {
                continue;
            }
            let view = self
                .adapter
                .view_for_supplement(&*self.host.borrow(), section, &supplement);
            if let Some(view) = view {
                self.adapter.will_display_supplement(&view, section);
                self.host.borrow_mut().show_supplement(section, supplement, view);
            }
        }
    }

    /// Rows and sections inside the visible window.
    fn window(&self) -> (Vec<IndexPath>, Vec<usize>) {
        let end = self.scroll_offset.saturating_add(self.visible_rows);
        let mut paths = Vec::new();
        let mut sections = Vec::new();
        let mut position = 0;
        for (index, section) in self.adapter.sections().iter().enumerate() {
            let start = position;
            position += section.len();
            let visible = if section.is_empty() {
                start >= self.scroll_offset && start < end
            } else {
                start < end && position > self.scroll_offset
            };
            if visible {
                sections.push(index);
            }
            for row in 0..section.len() {
                let flat = start + row;
                if flat >= self.scroll_offset && flat < end {
                    paths.push(IndexPath::new(index, row));
                }
            }
        }
        (paths, sections)
    }
}
