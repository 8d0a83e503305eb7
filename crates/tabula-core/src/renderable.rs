//! The renderable contract every row, header and footer satisfies.

use crate::geometry::{EdgeInsets, Size, SizeConstraint};
use crate::view::{NativeView, View, ViewStorage};

/// A value that knows how to materialize and update a native view.
///
/// Equality is component-level: two values are equal when rendering either
/// into the same view produces the same result. The diff engine relies on it
/// to tell unchanged rows from updated ones.
///
/// Every hook beyond [`render`](Renderable::render) has a default, and every
/// capability query answers `None` unless a component opts in.
pub trait Renderable: PartialEq + 'static {
    type View: NativeView;

    /// Constructs a fresh view with no bound data.
    fn generate(&self) -> Self::View {
        Self::View::generate()
    }

    /// Binds `self` into `view`. Must be idempotent.
    fn render(&self, view: &Self::View);

    /// Size of the rendered component under `constraint`.
    ///
    /// The default renders into an off-screen view whose margins are raised to
    /// at least `inherited_margins`, then asks the view for its fitting size.
    fn size_bound_to(&self, constraint: SizeConstraint, inherited_margins: EdgeInsets) -> Size {
        let view = self.generate();
        self.render(&view);
        view.set_layout_margins(view.layout_margins().max_each(inherited_margins));
        view.fitting_size(constraint)
    }

    fn did_mount(&self, view: &Self::View, storage: &mut ViewStorage) {
        let _ = (view, storage);
    }

    fn will_unmount(&self, view: &Self::View, storage: &mut ViewStorage) {
        let _ = (view, storage);
    }

    fn will_display(&self, view: &Self::View) {
        let _ = view;
    }

    fn did_end_displaying(&self, view: &Self::View) {
        let _ = view;
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        None
    }

    fn as_menu_responding(&self) -> Option<&dyn MenuItemsResponding> {
        None
    }

    fn as_lifecycle_aware(&self) -> Option<&dyn ComponentLifecycleAware> {
        None
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        None
    }
}

/// Rows that can be removed through a swipe or edit action.
pub trait Deletable {
    fn delete_action_text(&self) -> String {
        "Delete".to_string()
    }

    fn can_be_deleted(&self) -> bool {
        true
    }

    /// Invoked after the row has been removed from the list.
    fn delete(&self);
}

/// Identifier of a contextual menu action.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MenuAction(pub String);

impl MenuAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn copy() -> Self {
        Self::new("copy")
    }
}

/// An entry of a contextual menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuItem {
    pub title: String,
    pub action: MenuAction,
}

impl MenuItem {
    pub fn new(title: impl Into<String>, action: MenuAction) -> Self {
        Self {
            title: title.into(),
            action,
        }
    }
}

/// Rows that show a contextual menu.
pub trait MenuItemsResponding {
    fn menu_items(&self) -> Vec<MenuItem> {
        Vec::new()
    }

    fn responds_to(&self, action: &MenuAction) -> bool;

    fn perform(&self, action: &MenuAction);
}

/// Component-level display notifications, independent of the bound view.
pub trait ComponentLifecycleAware {
    fn will_display_item(&self);
    fn did_end_displaying_item(&self);
}

/// Rows that can take input focus.
pub trait Focusable {
    fn is_focus_eligible(&self) -> bool {
        true
    }
}
