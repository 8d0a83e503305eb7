//! A list host that records what the adapter asks of it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tabula_core::{EdgeInsets, IndexPath, Size, Supplement, ViewRef};
use tabula_foundation::diff::{resolve_destinations, InvalidUpdate};
use tabula_ui::{
    BatchUpdate, ContainerCell, ContainerKind, ContentView, HeaderFooterView, ListHost,
    ListMetrics, ListOperation, RowAnimation,
};

/// Observable state of a [`TestContentView`].
#[derive(Default)]
pub struct ContentViewState {
    pub subviews: Vec<ViewRef>,
    pub transitions: Vec<f32>,
    pub animations_enabled: bool,
}

/// Content view that keeps its subviews in a list and records transitions.
pub struct TestContentView {
    state: Rc<RefCell<ContentViewState>>,
}

impl TestContentView {
    pub fn new(animations_enabled: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(ContentViewState {
                animations_enabled,
                ..ContentViewState::default()
            })),
        }
    }

    pub fn state(&self) -> Rc<RefCell<ContentViewState>> {
        self.state.clone()
    }
}

impl ContentView for TestContentView {
    fn add_subview(&self, view: &ViewRef) {
        self.state.borrow_mut().subviews.push(view.clone());
    }

    fn remove_subview(&self, view: &ViewRef) {
        self.state
            .borrow_mut()
            .subviews
            .retain(|subview| !Rc::ptr_eq(subview, view));
    }

    fn animations_enabled(&self) -> bool {
        self.state.borrow().animations_enabled
    }

    fn transition(&self, duration: f32, changes: &mut dyn FnMut()) {
        self.state.borrow_mut().transitions.push(duration);
        changes();
    }
}

/// Views that left the screen during an update and still await their
/// end-of-display callback.
#[derive(Default)]
pub struct EndedViews {
    pub cells: Vec<(IndexPath, Rc<ContainerCell>)>,
    pub supplements: Vec<((usize, Supplement), Rc<HeaderFooterView>)>,
}

/// In-memory list host.
///
/// Keeps a model of the row counts a native list would derive from the
/// operations it receives, together with the views it has on screen
/// remapped through every batch. Inserted sections have unknown row counts
/// until the harness syncs them from the adapter.
pub struct TestListHost {
    bounds: Size,
    margins: EdgeInsets,
    metrics: ListMetrics,
    animations_enabled: bool,
    row_counts: Vec<Option<usize>>,
    batches: Vec<BatchUpdate>,
    reloads: usize,
    deletions: Vec<(Vec<IndexPath>, RowAnimation)>,
    failures: Vec<InvalidUpdate>,
    needs_reload: bool,
    visible_cells: BTreeMap<IndexPath, Rc<ContainerCell>>,
    visible_supplements: BTreeMap<(usize, Supplement), Rc<HeaderFooterView>>,
    ended: EndedViews,
    content_views: RefCell<Vec<Rc<RefCell<ContentViewState>>>>,
}

impl Default for TestListHost {
    fn default() -> Self {
        Self::new(Size::new(320.0, 480.0))
    }
}

impl TestListHost {
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds,
            margins: EdgeInsets::ZERO,
            metrics: ListMetrics::default(),
            animations_enabled: true,
            row_counts: Vec::new(),
            batches: Vec::new(),
            reloads: 0,
            deletions: Vec::new(),
            failures: Vec::new(),
            needs_reload: false,
            visible_cells: BTreeMap::new(),
            visible_supplements: BTreeMap::new(),
            ended: EndedViews::default(),
            content_views: RefCell::new(Vec::new()),
        }
    }

    pub fn with_margins(mut self, margins: EdgeInsets) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_metrics(mut self, metrics: ListMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Content views made from now on report animations as disabled.
    pub fn without_animations(mut self) -> Self {
        self.animations_enabled = false;
        self
    }

    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    pub fn batches(&self) -> &[BatchUpdate] {
        &self.batches
    }

    pub fn last_batch(&self) -> Option<&BatchUpdate> {
        self.batches.last()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads
    }

    pub fn deletions(&self) -> &[(Vec<IndexPath>, RowAnimation)] {
        &self.deletions
    }

    pub fn failures(&self) -> &[InvalidUpdate] {
        &self.failures
    }

    pub fn content_views(&self) -> Vec<Rc<RefCell<ContentViewState>>> {
        self.content_views.borrow().clone()
    }

    /// Row counts derived from the operations received so far.
    pub fn row_counts(&self) -> &[Option<usize>] {
        &self.row_counts
    }

    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// Replaces the row-count model with counts reported by the data
    /// source, as a native list does after a reload.
    pub fn sync_row_counts(&mut self, counts: impl IntoIterator<Item = usize>) {
        self.row_counts = counts.into_iter().map(Some).collect();
        self.needs_reload = false;
    }

    pub fn visible_cells(&self) -> &BTreeMap<IndexPath, Rc<ContainerCell>> {
        &self.visible_cells
    }

    pub fn show_cell(&mut self, path: IndexPath, cell: Rc<ContainerCell>) {
        self.visible_cells.insert(path, cell);
    }

    pub fn hide_cell(&mut self, path: IndexPath) -> Option<Rc<ContainerCell>> {
        self.visible_cells.remove(&path)
    }

    pub fn visible_supplements(&self) -> &BTreeMap<(usize, Supplement), Rc<HeaderFooterView>> {
        &self.visible_supplements
    }

    pub fn show_supplement(
        &mut self,
        section: usize,
        supplement: Supplement,
        view: Rc<HeaderFooterView>,
    ) {
        self.visible_supplements.insert((section, supplement), view);
    }

    pub fn hide_supplement(
        &mut self,
        section: usize,
        supplement: &Supplement,
    ) -> Option<Rc<HeaderFooterView>> {
        self.visible_supplements.remove(&(section, supplement.clone()))
    }

    /// Views pushed off screen by updates since the last call.
    pub fn take_ended(&mut self) -> EndedViews {
        std::mem::take(&mut self.ended)
    }

    fn apply(&mut self, update: &BatchUpdate) {
        if let Err(err) = self.replay(update) {
            log::error!("invalid batch update: {err}");
            self.failures.push(err);
        }
    }

    fn replay(&mut self, update: &BatchUpdate) -> Result<(), InvalidUpdate> {
        let mut section_removals = Vec::new();
        let mut section_inserts = Vec::new();
        let mut section_moves = Vec::new();
        let mut row_removals = Vec::new();
        let mut row_inserts = Vec::new();
        let mut row_moves = Vec::new();
        let mut reloads = Vec::new();
        let mut section_reloads = Vec::new();
        for operation in &update.operations {
            match operation {
                ListOperation::DeleteSections(sections, _) => {
                    section_removals.extend(sections.iter().copied())
                }
                ListOperation::InsertSections(sections, _) => {
                    section_inserts.extend(sections.iter().copied())
                }
                ListOperation::MoveSection { from, to } => section_moves.push((*from, *to)),
                ListOperation::DeleteRows(paths, _) => row_removals.extend(paths.iter().copied()),
                ListOperation::InsertRows(paths, _) => row_inserts.extend(paths.iter().copied()),
                ListOperation::MoveRow { from, to } => row_moves.push((*from, *to)),
                ListOperation::ReloadRows(paths, _) => reloads.extend(paths.iter().copied()),
                ListOperation::ReloadSections(sections, _) => {
                    section_reloads.extend(sections.iter().copied())
                }
            }
        }

        let section_sources = resolve_destinations(
            self.row_counts.len(),
            &section_removals,
            &section_inserts,
            section_moves,
        )?;

        let mut counts = Vec::with_capacity(section_sources.len());
        let mut row_sources = Vec::with_capacity(section_sources.len());
        for (destination, source) in section_sources.iter().enumerate() {
            let Some(source) = *source else {
                counts.push(None);
                row_sources.push(Vec::new());
                continue;
            };
            if section_reloads.contains(&source) {
                let touched = row_removals.iter().any(|path| path.section == source)
                    || row_inserts.iter().any(|path| path.section == destination)
                    || row_moves.iter().any(|(from, _)| from.section == source);
                assert!(!touched, "rows of reloaded section {source} edited in the same batch");
                counts.push(None);
                row_sources.push(Vec::new());
                continue;
            }
            let Some(old_count) = self.row_counts[source] else {
                panic!("batch update touches section {source} before its rows were counted");
            };
            let removals: Vec<usize> = row_removals
                .iter()
                .filter(|path| path.section == source)
                .map(|path| path.row)
                .collect();
            let inserts: Vec<usize> = row_inserts
                .iter()
                .filter(|path| path.section == destination)
                .map(|path| path.row)
                .collect();
            let moves = row_moves
                .iter()
                .filter(|(from, _)| from.section == source)
                .map(|(from, to)| {
                    assert_eq!(
                        to.section, destination,
                        "rows moved across sections are not modelled"
                    );
                    (from.row, to.row)
                });
            let sources = resolve_destinations(old_count, &removals, &inserts, moves)?;
            counts.push(Some(sources.len()));
            row_sources.push(sources);
        }

        let mut previous_cells = std::mem::take(&mut self.visible_cells);
        for path in &reloads {
            if let Some(cell) = previous_cells.remove(path) {
                self.ended.cells.push((*path, cell));
            }
        }
        let mut previous_supplements = std::mem::take(&mut self.visible_supplements);
        for (destination, (source, rows)) in section_sources.iter().zip(&row_sources).enumerate() {
            let Some(source) = *source else {
                continue;
            };
            if section_reloads.contains(&source) {
                continue;
            }
            for (row, row_source) in rows.iter().enumerate() {
                let Some(row_source) = *row_source else {
                    continue;
                };
                if let Some(cell) = previous_cells.remove(&IndexPath::new(source, row_source)) {
                    self.visible_cells.insert(IndexPath::new(destination, row), cell);
                }
            }
            let kept: Vec<Supplement> = previous_supplements
                .keys()
                .filter(|(section, _)| *section == source)
                .map(|(_, supplement)| supplement.clone())
                .collect();
            for supplement in kept {
                if let Some(view) = previous_supplements.remove(&(source, supplement.clone())) {
                    self.visible_supplements.insert((destination, supplement), view);
                }
            }
        }
        self.ended.cells.extend(previous_cells);
        self.ended.supplements.extend(previous_supplements);

        self.row_counts = counts;
        Ok(())
    }
}

impl ListHost for TestListHost {
    fn reload_data(&mut self) {
        self.reloads += 1;
        self.needs_reload = true;
        self.ended
            .cells
            .extend(std::mem::take(&mut self.visible_cells));
        self.ended
            .supplements
            .extend(std::mem::take(&mut self.visible_supplements));
    }

    fn perform_batch_updates(&mut self, update: BatchUpdate) {
        self.apply(&update);
        self.batches.push(update);
    }

    fn delete_rows(&mut self, paths: &[IndexPath], animation: RowAnimation) {
        let update = BatchUpdate {
            operations: vec![ListOperation::DeleteRows(paths.to_vec(), animation)],
        };
        self.apply(&update);
        self.deletions.push((paths.to_vec(), animation));
    }

    fn bounds(&self) -> Size {
        self.bounds
    }

    fn layout_margins(&self) -> EdgeInsets {
        self.margins
    }

    fn metrics(&self) -> ListMetrics {
        self.metrics
    }

    fn visible_cell(&self, path: IndexPath) -> Option<Rc<ContainerCell>> {
        self.visible_cells.get(&path).cloned()
    }

    fn visible_supplement(
        &self,
        section: usize,
        supplement: &Supplement,
    ) -> Option<Rc<HeaderFooterView>> {
        self.visible_supplements
            .get(&(section, supplement.clone()))
            .cloned()
    }

    fn make_content_view(&self, _kind: ContainerKind) -> Box<dyn ContentView> {
        let view = TestContentView::new(self.animations_enabled);
        self.content_views.borrow_mut().push(view.state());
        Box::new(view)
    }
}
