//! Contract between the adapter and the native list it drives.

use std::rc::Rc;

use smallvec::SmallVec;
use tabula_core::{EdgeInsets, IndexPath, Size, Supplement, ViewRef};

use crate::containers::{ContainerCell, HeaderFooterView};

/// Visual effect of an inserted, deleted or reloaded row or section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RowAnimation {
    None,
    #[default]
    Automatic,
    Fade,
    Left,
    Right,
    Top,
    Bottom,
    Middle,
}

/// Animations for each kind of edit in a batch update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableViewAnimation {
    pub section_insertion: RowAnimation,
    pub section_deletion: RowAnimation,
    pub section_reload: RowAnimation,
    pub row_insertion: RowAnimation,
    pub row_deletion: RowAnimation,
    pub row_reload: RowAnimation,
}

impl Default for TableViewAnimation {
    fn default() -> Self {
        Self::automatic()
    }
}

impl TableViewAnimation {
    pub const fn uniform(animation: RowAnimation) -> Self {
        Self {
            section_insertion: animation,
            section_deletion: animation,
            section_reload: animation,
            row_insertion: animation,
            row_deletion: animation,
            row_reload: animation,
        }
    }

    pub const fn automatic() -> Self {
        Self::uniform(RowAnimation::Automatic)
    }

    pub const fn fade() -> Self {
        Self::uniform(RowAnimation::Fade)
    }

    /// Not animated. Updates with this animation reload the whole list.
    pub const fn none() -> Self {
        Self::uniform(RowAnimation::None)
    }

    pub fn is_animated(&self) -> bool {
        *self != Self::none()
    }
}

/// Sizes the host falls back to when the adapter has no measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListMetrics {
    pub row_height: f32,
    pub estimated_row_height: f32,
    pub header_height: f32,
    pub estimated_header_height: f32,
    pub footer_height: f32,
    pub estimated_footer_height: f32,
    /// Extent of the separator drawn below every row, zero when hidden.
    pub separator_height: f32,
}

impl Default for ListMetrics {
    fn default() -> Self {
        Self {
            row_height: 44.0,
            estimated_row_height: 44.0,
            header_height: 28.0,
            estimated_header_height: 28.0,
            footer_height: 28.0,
            estimated_footer_height: 28.0,
            separator_height: 0.0,
        }
    }
}

/// One step of a batch update.
///
/// Deletions, reloads and move sources address the list before the batch;
/// insertions and move destinations address it after the batch.
#[derive(Clone, Debug, PartialEq)]
pub enum ListOperation {
    DeleteSections(SmallVec<[usize; 4]>, RowAnimation),
    InsertSections(SmallVec<[usize; 4]>, RowAnimation),
    MoveSection { from: usize, to: usize },
    DeleteRows(Vec<IndexPath>, RowAnimation),
    InsertRows(Vec<IndexPath>, RowAnimation),
    MoveRow { from: IndexPath, to: IndexPath },
    ReloadRows(Vec<IndexPath>, RowAnimation),
    /// Reloads whole sections, rows and supplements included.
    ReloadSections(SmallVec<[usize; 4]>, RowAnimation),
}

/// Operations applied by the host as one atomic update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchUpdate {
    pub operations: Vec<ListOperation>,
}

impl BatchUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: ListOperation) {
        log::trace!("list operation: {operation:?}");
        self.operations.push(operation);
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

/// Which container a content view is made for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Cell,
    HeaderFooter,
}

/// The native view inside a container that hosts the component's view.
pub trait ContentView {
    fn add_subview(&self, view: &ViewRef);

    fn remove_subview(&self, view: &ViewRef);

    fn animations_enabled(&self) -> bool {
        true
    }

    /// Runs `changes` as an animated cross-fade of `duration` seconds.
    fn transition(&self, duration: f32, changes: &mut dyn FnMut()) {
        let _ = duration;
        changes();
    }
}

/// A native list control driven by a [`TableAdapter`](crate::TableAdapter).
///
/// Hosts request cells, supplements and sizes from the adapter lazily. They
/// must not call back into the adapter from within these methods.
pub trait ListHost {
    /// Discards all rows and sections and asks the adapter again.
    fn reload_data(&mut self);

    fn perform_batch_updates(&mut self, update: BatchUpdate);

    fn delete_rows(&mut self, paths: &[IndexPath], animation: RowAnimation);

    fn bounds(&self) -> Size;

    fn layout_margins(&self) -> EdgeInsets {
        EdgeInsets::ZERO
    }

    fn metrics(&self) -> ListMetrics {
        ListMetrics::default()
    }

    /// The cell currently on screen at `path`, if any.
    fn visible_cell(&self, path: IndexPath) -> Option<Rc<ContainerCell>>;

    /// The supplement view currently on screen for `section`, if any.
    fn visible_supplement(
        &self,
        section: usize,
        supplement: &Supplement,
    ) -> Option<Rc<HeaderFooterView>>;

    fn make_content_view(&self, kind: ContainerKind) -> Box<dyn ContentView>;
}
