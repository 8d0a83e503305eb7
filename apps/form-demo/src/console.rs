//! A list host that prints what a native list control would animate.

use std::cell::RefCell;
use std::rc::Rc;

use tabula_core::{IndexPath, Size, Supplement, ViewRef};
use tabula_ui::{
    BatchUpdate, ContainerCell, ContainerKind, ContentView, HeaderFooterView, ListHost,
    ListOperation, RowAnimation,
};

pub struct ConsoleContentView {
    kind: ContainerKind,
    subviews: RefCell<Vec<ViewRef>>,
}

impl ContentView for ConsoleContentView {
    fn add_subview(&self, view: &ViewRef) {
        self.subviews.borrow_mut().push(view.clone());
    }

    fn remove_subview(&self, view: &ViewRef) {
        self.subviews
            .borrow_mut()
            .retain(|subview| !Rc::ptr_eq(subview, view));
    }

    fn transition(&self, duration: f32, changes: &mut dyn FnMut()) {
        println!("    cross-fade {duration}s in {:?}", self.kind);
        changes();
    }
}

/// Prints every update and keeps no views on screen.
pub struct ConsoleHost {
    bounds: Size,
    updates: usize,
}

impl ConsoleHost {
    pub fn new(bounds: Size) -> Self {
        Self { bounds, updates: 0 }
    }

    /// Batches and reloads received so far.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

fn describe(operation: &ListOperation) -> String {
    fn paths(paths: &[IndexPath]) -> String {
        paths
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    match operation {
        ListOperation::DeleteSections(sections, animation) => {
            format!("delete sections {sections:?} ({animation:?})")
        }
        ListOperation::InsertSections(sections, animation) => {
            format!("insert sections {sections:?} ({animation:?})")
        }
        ListOperation::MoveSection { from, to } => format!("move section {from} -> {to}"),
        ListOperation::DeleteRows(rows, animation) => {
            format!("delete rows [{}] ({animation:?})", paths(rows))
        }
        ListOperation::InsertRows(rows, animation) => {
            format!("insert rows [{}] ({animation:?})", paths(rows))
        }
        ListOperation::MoveRow { from, to } => format!("move row {from} -> {to}"),
        ListOperation::ReloadRows(rows, animation) => {
            format!("reload rows [{}] ({animation:?})", paths(rows))
        }
        ListOperation::ReloadSections(sections, animation) => {
            format!("reload sections {sections:?} ({animation:?})")
        }
    }
}

impl ListHost for ConsoleHost {
    fn reload_data(&mut self) {
        self.updates += 1;
        println!("  reload data");
    }

    fn perform_batch_updates(&mut self, update: BatchUpdate) {
        self.updates += 1;
        println!("  batch of {} operations", update.len());
        for operation in &update.operations {
            println!("    {}", describe(operation));
        }
    }

    fn delete_rows(&mut self, paths: &[IndexPath], animation: RowAnimation) {
        self.updates += 1;
        for path in paths {
            println!("  delete row {path} ({animation:?})");
        }
    }

    fn bounds(&self) -> Size {
        self.bounds
    }

    fn visible_cell(&self, _path: IndexPath) -> Option<Rc<ContainerCell>> {
        None
    }

    fn visible_supplement(
        &self,
        _section: usize,
        _supplement: &Supplement,
    ) -> Option<Rc<HeaderFooterView>> {
        None
    }

    fn make_content_view(&self, kind: ContainerKind) -> Box<dyn ContentView> {
        Box::new(ConsoleContentView {
            kind,
            subviews: RefCell::new(Vec::new()),
        })
    }
}
