//! Type erasure for renderables.
//!
//! [`AnyRenderable`] hides the concrete component type so rows of different
//! kinds can live in one section. The concrete type is captured once, at wrap
//! time, as a [`ReuseIdentifier`] and a view [`TypeId`]; everything else goes
//! through a fixed set of capability queries.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::geometry::{EdgeInsets, Size, SizeConstraint};
use crate::renderable::{
    ComponentLifecycleAware, Deletable, Focusable, MenuItemsResponding, Renderable,
};
use crate::view::{view_type_id, View, ViewRef, ViewStorage};

/// Reuse-pool bucket of a component: its concrete type.
#[derive(Clone, Copy)]
pub struct ReuseIdentifier {
    type_id: TypeId,
    name: &'static str,
}

impl ReuseIdentifier {
    pub fn of<R: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<R>(),
            name: type_name::<R>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified name of the component type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ReuseIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ReuseIdentifier {}

impl Hash for ReuseIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ReuseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

trait ErasedRenderable {
    fn as_any(&self) -> &dyn Any;
    fn view_type(&self) -> TypeId;
    fn view_type_name(&self) -> &'static str;
    fn generate(&self) -> ViewRef;
    fn render(&self, view: &dyn View);
    fn size_bound_to(&self, constraint: SizeConstraint, inherited_margins: EdgeInsets) -> Size;
    fn did_mount(&self, view: &dyn View, storage: &mut ViewStorage);
    fn will_unmount(&self, view: &dyn View, storage: &mut ViewStorage);
    fn will_display(&self, view: &dyn View);
    fn did_end_displaying(&self, view: &dyn View);
    fn eq_erased(&self, other: &dyn ErasedRenderable) -> bool;
    fn as_deletable(&self) -> Option<&dyn Deletable>;
    fn as_menu_responding(&self) -> Option<&dyn MenuItemsResponding>;
    fn as_lifecycle_aware(&self) -> Option<&dyn ComponentLifecycleAware>;
    fn as_focusable(&self) -> Option<&dyn Focusable>;
}

struct RenderableBox<R>(R);

impl<R: Renderable> RenderableBox<R> {
    fn view<'v>(&self, view: &'v dyn View) -> &'v R::View {
        match view.as_any().downcast_ref::<R::View>() {
            Some(view) => view,
            None => panic!(
                "{} cannot render into a view that is not {}",
                type_name::<R>(),
                type_name::<R::View>()
            ),
        }
    }
}

impl<R: Renderable> ErasedRenderable for RenderableBox<R> {
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn view_type(&self) -> TypeId {
        TypeId::of::<R::View>()
    }

    fn view_type_name(&self) -> &'static str {
        type_name::<R::View>()
    }

    fn generate(&self) -> ViewRef {
        Rc::new(self.0.generate())
    }

    fn render(&self, view: &dyn View) {
        self.0.render(self.view(view));
    }

    fn size_bound_to(&self, constraint: SizeConstraint, inherited_margins: EdgeInsets) -> Size {
        self.0.size_bound_to(constraint, inherited_margins)
    }

    fn did_mount(&self, view: &dyn View, storage: &mut ViewStorage) {
        self.0.did_mount(self.view(view), storage);
    }

    fn will_unmount(&self, view: &dyn View, storage: &mut ViewStorage) {
        self.0.will_unmount(self.view(view), storage);
    }

    fn will_display(&self, view: &dyn View) {
        self.0.will_display(self.view(view));
    }

    fn did_end_displaying(&self, view: &dyn View) {
        self.0.did_end_displaying(self.view(view));
    }

    fn eq_erased(&self, other: &dyn ErasedRenderable) -> bool {
        other
            .as_any()
            .downcast_ref::<R>()
            .map_or(false, |other| self.0 == *other)
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        self.0.as_deletable()
    }

    fn as_menu_responding(&self) -> Option<&dyn MenuItemsResponding> {
        self.0.as_menu_responding()
    }

    fn as_lifecycle_aware(&self) -> Option<&dyn ComponentLifecycleAware> {
        self.0.as_lifecycle_aware()
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        self.0.as_focusable()
    }
}

/// A type-erased, cheaply clonable renderable.
#[derive(Clone)]
pub struct AnyRenderable {
    base: Rc<dyn ErasedRenderable>,
    reuse_identifier: ReuseIdentifier,
}

impl AnyRenderable {
    pub fn new<R: Renderable>(component: R) -> Self {
        Self {
            base: Rc::new(RenderableBox(component)),
            reuse_identifier: ReuseIdentifier::of::<R>(),
        }
    }

    /// Identity of the concrete component type.
    pub fn reuse_identifier(&self) -> ReuseIdentifier {
        self.reuse_identifier
    }

    pub fn component_type(&self) -> TypeId {
        self.reuse_identifier.type_id()
    }

    pub fn component_type_name(&self) -> &'static str {
        self.reuse_identifier.name()
    }

    /// Concrete type of the view this component renders into.
    pub fn view_type(&self) -> TypeId {
        self.base.view_type()
    }

    pub fn view_type_name(&self) -> &'static str {
        self.base.view_type_name()
    }

    /// Whether `view` is of the concrete type this component renders into.
    pub fn can_render_into(&self, view: &dyn View) -> bool {
        view_type_id(view) == self.view_type()
    }

    pub fn generate(&self) -> ViewRef {
        self.base.generate()
    }

    /// Renders into `view`.
    ///
    /// # Panics
    /// If `view` is not of the component's view type.
    pub fn render(&self, view: &dyn View) {
        self.base.render(view);
    }

    pub fn size_bound_to(&self, constraint: SizeConstraint, inherited_margins: EdgeInsets) -> Size {
        self.base.size_bound_to(constraint, inherited_margins)
    }

    pub fn did_mount(&self, view: &dyn View, storage: &mut ViewStorage) {
        self.base.did_mount(view, storage);
    }

    pub fn will_unmount(&self, view: &dyn View, storage: &mut ViewStorage) {
        self.base.will_unmount(view, storage);
    }

    pub fn will_display(&self, view: &dyn View) {
        self.base.will_display(view);
    }

    pub fn did_end_displaying(&self, view: &dyn View) {
        self.base.did_end_displaying(view);
    }

    /// Typed access to the wrapped component.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.base.as_any().downcast_ref::<T>()
    }

    pub fn as_deletable(&self) -> Option<&dyn Deletable> {
        self.base.as_deletable()
    }

    pub fn as_menu_responding(&self) -> Option<&dyn MenuItemsResponding> {
        self.base.as_menu_responding()
    }

    pub fn as_lifecycle_aware(&self) -> Option<&dyn ComponentLifecycleAware> {
        self.base.as_lifecycle_aware()
    }

    pub fn as_focusable(&self) -> Option<&dyn Focusable> {
        self.base.as_focusable()
    }
}

impl<R: Renderable> From<R> for AnyRenderable {
    fn from(component: R) -> Self {
        AnyRenderable::new(component)
    }
}

impl PartialEq for AnyRenderable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.base, &other.base)
            || (self.reuse_identifier == other.reuse_identifier
                && self.base.eq_erased(other.base.as_ref()))
    }
}

impl fmt::Debug for AnyRenderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyRenderable<{}>", self.reuse_identifier.name())
    }
}
