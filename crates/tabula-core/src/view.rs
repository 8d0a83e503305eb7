//! Contract between the framework and native views.
//!
//! The native toolkit is external. A view only has to expose enough for the
//! framework to erase it ([`View::as_any`]), walk its subtree for display
//! notifications and measure it.

use std::any::{Any, TypeId};
use std::rc::Rc;

use crate::collections::map::HashMap;
use crate::geometry::{EdgeInsets, Size, SizeConstraint};
use crate::reuse::ReuseToken;

/// Shared handle to a type-erased native view.
pub type ViewRef = Rc<dyn View>;

/// A native view as seen by the framework.
///
/// Views are shared (`Rc`) and mutated through interior mutability, like the
/// retained view objects of native toolkits.
pub trait View: Any {
    fn as_any(&self) -> &dyn Any;

    /// Direct children, in z-order.
    fn subviews(&self) -> Vec<ViewRef> {
        Vec::new()
    }

    /// Views opting into display notifications return `Some(self)`.
    fn lifecycle_aware(&self) -> Option<&dyn ViewLifecycleAware> {
        None
    }

    fn layout_margins(&self) -> EdgeInsets {
        EdgeInsets::ZERO
    }

    fn set_layout_margins(&self, margins: EdgeInsets) {
        let _ = margins;
    }

    /// Lays the view out against `constraint` and returns the fitting size.
    fn fitting_size(&self, constraint: SizeConstraint) -> Size;
}

/// A concrete view type that components render into.
pub trait NativeView: View + Sized {
    /// Constructs a fresh view with no bound data.
    fn generate() -> Self;
}

/// Display notifications delivered to every opted-in view of a cell's subtree.
pub trait ViewLifecycleAware {
    fn will_display_view(&self);
    fn did_end_displaying_view(&self);
}

/// Concrete type of the view behind a handle.
pub fn view_type_id(view: &dyn View) -> TypeId {
    Any::type_id(view.as_any())
}

/// Visits `view` and then its subtree, depth-first in pre-order.
pub fn for_each_view_in_subtree(view: &ViewRef, visit: &mut dyn FnMut(&ViewRef)) {
    visit(view);
    for child in view.subviews() {
        for_each_view_in_subtree(&child, visit);
    }
}

/// Per-view storage handed to mount/unmount hooks.
///
/// Lives as long as the contained view of a reusable container; it is reset
/// whenever that view is replaced by one of a different type.
#[derive(Debug)]
pub struct ViewStorage {
    values: HashMap<TypeId, Box<dyn Any>>,
    token: ReuseToken,
}

impl Default for ViewStorage {
    fn default() -> Self {
        Self {
            values: HashMap::default(),
            token: ReuseToken::inactive(),
        }
    }
}

impl ViewStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the value of the same type it replaced.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
            .map(|previous| *previous)
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut::<T>())
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Token of the binding this storage currently serves.
    pub fn reuse_token(&self) -> ReuseToken {
        self.token.clone()
    }

    pub fn set_reuse_token(&mut self, token: ReuseToken) {
        self.token = token;
    }
}
