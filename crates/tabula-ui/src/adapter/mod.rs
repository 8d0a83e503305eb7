//! Reconciler between forms and a native list.
//!
//! [`TableAdapter`] keeps the last applied snapshot, turns every update into
//! a batch of list operations, and serves the host's lazy queries for
//! counts, views, sizes, actions and display callbacks.

mod spec;
mod store;

pub use spec::TableAdapterSpec;
pub use store::SizeLookup;

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use tabula_core::{
    AnyRenderable, IndexPath, MenuAction, MenuItem, Node, ReuseIdentifier, Section, Supplement,
};
use tabula_foundation::{ReusePool, ReuseStats, SectionedChangeset};

use crate::containers::{ContainerCell, HeaderFooterView};
use crate::host::{
    BatchUpdate, ContainerKind, ListHost, ListOperation, RowAnimation, TableViewAnimation,
};
use crate::reusable_view::ReusableView;
use store::{AdapterStore, MeasureContext};

/// Extent reported for a supplement the section does not have. Hosts treat
/// zero as "use the default", so the smallest positive extent collapses it.
pub const ABSENT_SUPPLEMENT_EXTENT: f32 = f32::MIN_POSITIVE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowActionStyle {
    Normal,
    Destructive,
}

/// A swipe or edit action offered for a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowAction {
    pub title: String,
    pub style: RowActionStyle,
}

/// Drives a [`ListHost`] from successive snapshots of sections.
pub struct TableAdapter<S, R> {
    host: Option<Weak<RefCell<dyn ListHost>>>,
    store: AdapterStore<S, R>,
    cells: ReusePool<ReuseIdentifier, Rc<ContainerCell>>,
    supplements: ReusePool<ReuseIdentifier, Rc<HeaderFooterView>>,
}

impl<S, R> Default for TableAdapter<S, R>
where
    S: Hash + Eq,
    R: Hash + Eq,
{
    fn default() -> Self {
        Self::new(TableAdapterSpec::default())
    }
}

impl<S, R> TableAdapter<S, R>
where
    S: Hash + Eq,
    R: Hash + Eq,
{
    pub fn new(spec: TableAdapterSpec) -> Self {
        Self {
            host: None,
            store: AdapterStore::new(spec.axis, spec.known_supplements, spec.estimates_sizes),
            cells: ReusePool::with_policy(spec.reuse_policy.clone()),
            supplements: ReusePool::with_policy(spec.reuse_policy),
        }
    }

    /// Drives `host` from now on. The adapter keeps only a weak reference.
    pub fn attach<H: ListHost + 'static>(&mut self, host: &Rc<RefCell<H>>) {
        let host: Rc<RefCell<dyn ListHost>> = host.clone();
        self.host = Some(Rc::downgrade(&host));
    }

    pub fn detach(&mut self) {
        self.host = None;
        self.cells.clear();
        self.supplements.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.host().is_some()
    }

    fn host(&self) -> Option<Rc<RefCell<dyn ListHost>>> {
        self.host.as_ref().and_then(Weak::upgrade)
    }

    /// The last applied snapshot.
    pub fn sections(&self) -> &[Section<S, R>] {
        self.store.sections()
    }

    /// Applies `sections` as a minimal batch of animated list operations.
    ///
    /// Without an attached host nothing happens, not even the snapshot
    /// change. [`TableViewAnimation::none`] reloads the whole list instead.
    pub fn update(&mut self, sections: Vec<Section<S, R>>, animation: TableViewAnimation) {
        let Some(host) = self.host() else {
            log::debug!(
                "list host detached, skipping update to {} sections",
                sections.len()
            );
            return;
        };

        if !animation.is_animated() {
            log::debug!("unanimated update, reloading {} sections", sections.len());
            self.store.replace(sections);
            host.borrow_mut().reload_data();
            return;
        }

        let changeset = SectionedChangeset::diff(self.store.sections(), &sections);
        if changeset.is_empty() {
            log::debug!("update produced no changes");
            self.store.update(sections, &changeset);
            return;
        }

        let batch = batch_update(&changeset, animation);
        log::debug!(
            "updating {} -> {} sections: {} section edits, {} row edits, {} list operations",
            self.store.sections().len(),
            sections.len(),
            changeset.sections.len(),
            changeset.row_edit_count(),
            batch.len()
        );

        self.store.update(sections, &changeset);
        if !batch.is_empty() {
            host.borrow_mut().perform_batch_updates(batch);
        }
        self.rebind_visible(&*host.borrow(), &changeset);
    }

    /// Replaces the snapshot and reloads the whole list.
    pub fn reload(&mut self, sections: Vec<Section<S, R>>) {
        log::debug!("reloading {} sections", sections.len());
        self.store.replace(sections);
        if let Some(host) = self.host() {
            host.borrow_mut().reload_data();
        }
    }

    // Rows that moved while changing and supplements of moved sections are
    // not reloaded by the batch; their visible views take the new components
    // in place. Reloaded sections are served afresh by the host.
    fn rebind_visible(&self, host: &dyn ListHost, changeset: &SectionedChangeset) {
        let reloaded = reloaded_sections(changeset);
        for changes in &changeset.rows {
            if reloaded.contains(&changes.source_section) {
                continue;
            }
            let moved = changes.changeset.moves.iter().filter(|movement| movement.is_mutated);
            for movement in moved {
                let path = IndexPath::new(changes.destination_section, movement.destination);
                if let Some(cell) = host.visible_cell(path) {
                    log::trace!("rebinding moved row at {path}");
                    cell.bind(Some(self.store.node(path).component.clone()));
                }
            }
        }

        for changes in &changeset.supplements {
            if reloaded.contains(&changes.source_section) {
                continue;
            }
            let section = changes.destination_section;
            for supplement in &changes.changed {
                if let Some(view) = host.visible_supplement(section, supplement) {
                    log::trace!("rebinding {} of section {section}", supplement.name());
                    view.bind(self.store.supplement(section, supplement).cloned());
                }
            }
        }
    }

    pub fn number_of_sections(&self) -> usize {
        self.store.sections().len()
    }

    pub fn number_of_rows(&self, section: usize) -> usize {
        self.store.section(section).len()
    }

    pub fn node(&self, path: IndexPath) -> &Node<R> {
        self.store.node(path)
    }

    /// A cell bound to the row at `path`, recycled from the pool when a cell
    /// for the same component type is idle.
    pub fn cell_for_row(&mut self, host: &dyn ListHost, path: IndexPath) -> Rc<ContainerCell> {
        let component = self.store.node(path).component.clone();
        let cell = match self.cells.dequeue(&component.reuse_identifier()) {
            Some(cell) => cell,
            None => {
                self.cells.record_created();
                Rc::new(ContainerCell::new(host.make_content_view(ContainerKind::Cell)))
            }
        };
        cell.bind(Some(component));
        cell
    }

    pub fn view_for_header(
        &mut self,
        host: &dyn ListHost,
        section: usize,
    ) -> Option<Rc<HeaderFooterView>> {
        self.view_for_supplement(host, section, &Supplement::Header)
    }

    pub fn view_for_footer(
        &mut self,
        host: &dyn ListHost,
        section: usize,
    ) -> Option<Rc<HeaderFooterView>> {
        self.view_for_supplement(host, section, &Supplement::Footer)
    }

    pub fn view_for_supplement(
        &mut self,
        host: &dyn ListHost,
        section: usize,
        supplement: &Supplement,
    ) -> Option<Rc<HeaderFooterView>> {
        let component = self.store.supplement(section, supplement)?.clone();
        let view = match self.supplements.dequeue(&component.reuse_identifier()) {
            Some(view) => view,
            None => {
                self.supplements.record_created();
                Rc::new(HeaderFooterView::new(
                    host.make_content_view(ContainerKind::HeaderFooter),
                ))
            }
        };
        view.bind(Some(component));
        Some(view)
    }

    /// Parks a cell that left the screen for later reuse.
    pub fn enqueue_reusable_cell(&mut self, cell: Rc<ContainerCell>) {
        cell.binding().prepare_for_reuse();
        if let Some(key) = cell.binding().reuse_identifier() {
            self.cells.enqueue(key, cell);
        }
    }

    pub fn enqueue_reusable_supplement(&mut self, view: Rc<HeaderFooterView>) {
        view.binding().prepare_for_reuse();
        if let Some(key) = view.binding().reuse_identifier() {
            self.supplements.enqueue(key, view);
        }
    }

    /// Exact size of the row at `path`, measured on first query.
    pub fn size_for_row(&mut self, host: &dyn ListHost, path: IndexPath) -> SizeLookup {
        self.store.row_size(path, measure_context(host, false))
    }

    pub fn size_for_supplement(
        &mut self,
        host: &dyn ListHost,
        section: usize,
        supplement: &Supplement,
        allow_estimation: bool,
    ) -> SizeLookup {
        self.store
            .supplement_size(section, supplement, measure_context(host, allow_estimation))
    }

    pub fn height_for_row(&mut self, host: &dyn ListHost, path: IndexPath) -> f32 {
        let metrics = host.metrics();
        self.row_extent(host, path, false).unwrap_or(metrics.row_height)
    }

    pub fn estimated_height_for_row(&mut self, host: &dyn ListHost, path: IndexPath) -> f32 {
        let metrics = host.metrics();
        self.row_extent(host, path, true).unwrap_or(metrics.estimated_row_height)
    }

    pub fn height_for_header(&mut self, host: &dyn ListHost, section: usize) -> f32 {
        let fallback = host.metrics().header_height;
        self.supplement_extent(host, section, &Supplement::Header, false, fallback)
    }

    pub fn estimated_height_for_header(&mut self, host: &dyn ListHost, section: usize) -> f32 {
        let fallback = host.metrics().estimated_header_height;
        self.supplement_extent(host, section, &Supplement::Header, true, fallback)
    }

    pub fn height_for_footer(&mut self, host: &dyn ListHost, section: usize) -> f32 {
        let fallback = host.metrics().footer_height;
        self.supplement_extent(host, section, &Supplement::Footer, false, fallback)
    }

    pub fn estimated_height_for_footer(&mut self, host: &dyn ListHost, section: usize) -> f32 {
        let fallback = host.metrics().estimated_footer_height;
        self.supplement_extent(host, section, &Supplement::Footer, true, fallback)
    }

    fn row_extent(
        &mut self,
        host: &dyn ListHost,
        path: IndexPath,
        allow_estimation: bool,
    ) -> Option<f32> {
        let size = self
            .store
            .row_size(path, measure_context(host, allow_estimation))
            .size()?;
        Some(size.main_axis(self.store.axis()) + host.metrics().separator_height)
    }

    fn supplement_extent(
        &mut self,
        host: &dyn ListHost,
        section: usize,
        supplement: &Supplement,
        allow_estimation: bool,
        fallback: f32,
    ) -> f32 {
        match self.size_for_supplement(host, section, supplement, allow_estimation) {
            SizeLookup::NoCachedResult => fallback,
            SizeLookup::DoesNotExist => ABSENT_SUPPLEMENT_EXTENT,
            SizeLookup::Size(size) => size.main_axis(self.store.axis()),
        }
    }

    /// Forgets the measured size of the row at `path`.
    pub fn invalidate_size(&mut self, path: IndexPath) {
        self.store.invalidate_row(path);
    }

    pub fn invalidate_supplement_size(&mut self, section: usize, supplement: &Supplement) {
        self.store.invalidate_supplement(section, supplement);
    }

    /// Legacy edit actions: a delete action for deletable rows.
    pub fn edit_actions(&self, path: IndexPath) -> Option<Vec<RowAction>> {
        let deletable = self.store.node(path).component.as_deletable()?;
        deletable.can_be_deleted().then(|| {
            vec![RowAction {
                title: deletable.delete_action_text(),
                style: RowActionStyle::Destructive,
            }]
        })
    }

    /// Trailing swipe actions. Empty for rows that cannot be deleted.
    pub fn trailing_swipe_actions(&self, path: IndexPath) -> Vec<RowAction> {
        self.edit_actions(path).unwrap_or_default()
    }

    /// Deletes the row at `path` from the snapshot and the list, then tells
    /// the component. Returns whether the row was deleted.
    pub fn delete_row(&mut self, path: IndexPath) -> bool {
        let component: AnyRenderable = self.store.node(path).component.clone();
        let Some(deletable) = component
            .as_deletable()
            .filter(|deletable| deletable.can_be_deleted())
        else {
            return false;
        };

        self.store.remove_row(path);
        if let Some(host) = self.host() {
            host.borrow_mut().delete_rows(&[path], RowAnimation::Left);
        }
        log::debug!("deleted row at {path}");
        deletable.delete();
        true
    }

    /// Menu items to show for the row, or `None` when it has no menu.
    pub fn should_show_menu(&self, path: IndexPath) -> Option<Vec<MenuItem>> {
        self.store
            .node(path)
            .component
            .as_menu_responding()
            .map(|responder| responder.menu_items())
    }

    pub fn can_perform_action(&self, path: IndexPath, action: &MenuAction) -> bool {
        self.store
            .node(path)
            .component
            .as_menu_responding()
            .map_or(false, |responder| responder.responds_to(action))
    }

    /// Invokes `action` on the row's component. Returns whether it ran.
    pub fn perform_action(&self, path: IndexPath, action: &MenuAction) -> bool {
        let Some(responder) = self.store.node(path).component.as_menu_responding() else {
            return false;
        };
        if !responder.responds_to(action) {
            return false;
        }
        responder.perform(action);
        true
    }

    pub fn will_display_cell(&self, cell: &ContainerCell, path: IndexPath) {
        log::trace!("row {path} will display");
        cell.will_display_view();
    }

    pub fn did_end_displaying_cell(&self, cell: &ContainerCell, path: IndexPath) {
        log::trace!("row {path} did end displaying");
        cell.did_end_displaying_view();
    }

    pub fn will_display_supplement(&self, view: &HeaderFooterView, section: usize) {
        log::trace!("supplement of section {section} will display");
        view.will_display_view();
    }

    pub fn did_end_displaying_supplement(&self, view: &HeaderFooterView, section: usize) {
        log::trace!("supplement of section {section} did end displaying");
        view.did_end_displaying_view();
    }

    /// The first focus-eligible row after `after` in list order.
    pub fn next_focusable(&self, after: IndexPath) -> Option<IndexPath> {
        self.store
            .sections()
            .iter()
            .enumerate()
            .skip(after.section)
            .flat_map(|(index, section)| {
                section
                    .rows
                    .iter()
                    .enumerate()
                    .map(move |(row, node)| (IndexPath::new(index, row), node))
            })
            .filter(|(path, _)| *path > after)
            .find(|(_, node)| is_focus_eligible(&node.component))
            .map(|(path, _)| path)
    }

    pub fn has_focusable_successor(&self, after: IndexPath) -> bool {
        self.next_focusable(after).is_some()
    }

    pub fn reuse_stats(&self) -> &ReuseStats {
        self.cells.stats()
    }

    pub fn supplement_reuse_stats(&self) -> &ReuseStats {
        self.supplements.stats()
    }
}

fn is_focus_eligible(component: &AnyRenderable) -> bool {
    component
        .as_focusable()
        .map_or(false, |focusable| focusable.is_focus_eligible())
}

fn measure_context(host: &dyn ListHost, allow_estimation: bool) -> MeasureContext {
    MeasureContext {
        bounds: host.bounds(),
        margins: host.layout_margins(),
        allow_estimation,
    }
}

/// Sections changed in place, at their indices before the update.
fn reloaded_sections(changeset: &SectionedChangeset) -> SmallVec<[usize; 4]> {
    changeset
        .sections
        .mutations
        .iter()
        .map(|mutation| mutation.source)
        .collect()
}

/// Translates a changeset into list operations.
///
/// Changed rows and sections that kept their position are reloaded last.
/// A reloaded section takes its rows from the new snapshot, so its row edits
/// are not sent. Rows and sections that moved while changing are left to
/// in-place rebinding after the batch.
pub fn batch_update(changeset: &SectionedChangeset, animation: TableViewAnimation) -> BatchUpdate {
    let mut batch = BatchUpdate::new();
    let sections = &changeset.sections;
    let reloaded = reloaded_sections(changeset);

    if !sections.removals.is_empty() {
        batch.push(ListOperation::DeleteSections(
            sections.removals.iter().copied().collect(),
            animation.section_deletion,
        ));
    }
    if !sections.inserts.is_empty() {
        batch.push(ListOperation::InsertSections(
            sections.inserts.iter().copied().collect(),
            animation.section_insertion,
        ));
    }
    for movement in &sections.moves {
        batch.push(ListOperation::MoveSection {
            from: movement.source,
            to: movement.destination,
        });
    }

    let mut deletions = Vec::new();
    let mut insertions = Vec::new();
    let mut moves = Vec::new();
    let mut reloads = Vec::new();
    for changes in changeset
        .rows
        .iter()
        .filter(|changes| !reloaded.contains(&changes.source_section))
    {
        let (source, destination) = (changes.source_section, changes.destination_section);
        let rows = &changes.changeset;
        deletions.extend(rows.removals.iter().map(|&row| IndexPath::new(source, row)));
        insertions.extend(rows.inserts.iter().map(|&row| IndexPath::new(destination, row)));
        moves.extend(rows.moves.iter().map(|movement| ListOperation::MoveRow {
            from: IndexPath::new(source, movement.source),
            to: IndexPath::new(destination, movement.destination),
        }));
        reloads.extend(
            rows.mutations
                .iter()
                .map(|mutation| IndexPath::new(source, mutation.source)),
        );
    }

    if !deletions.is_empty() {
        batch.push(ListOperation::DeleteRows(deletions, animation.row_deletion));
    }
    if !insertions.is_empty() {
        batch.push(ListOperation::InsertRows(insertions, animation.row_insertion));
    }
    for movement in moves {
        batch.push(movement);
    }
    if !reloads.is_empty() {
        batch.push(ListOperation::ReloadRows(reloads, animation.row_reload));
    }
    if !reloaded.is_empty() {
        batch.push(ListOperation::ReloadSections(reloaded, animation.section_reload));
    }
    batch
}
