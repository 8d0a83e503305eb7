//! Data model and renderable contract for Tabula, a declarative list framework.
//!
//! Client code describes a list as a [`Form`]: ordered [`Section`]s of
//! ordered [`Node`]s, each wrapping a [`Renderable`] component behind an
//! [`AnyRenderable`]. The diff engine and the adapter built on top of this
//! crate turn successive forms into minimal list updates.

pub mod collections;

mod any_renderable;
mod form;
mod geometry;
mod node;
mod renderable;
mod reuse;
mod section;
mod view;

pub use any_renderable::{AnyRenderable, ReuseIdentifier};
pub use form::Form;
pub use geometry::{Axis, EdgeInsets, IndexPath, Size, SizeConstraint};
pub use node::Node;
pub use renderable::{
    ComponentLifecycleAware, Deletable, Focusable, MenuAction, MenuItem, MenuItemsResponding,
    Renderable,
};
pub use reuse::{bound_channel, BoundReceiver, BoundSender, ReuseScope, ReuseToken};
pub use section::{Section, Supplement};
pub use view::{
    for_each_view_in_subtree, view_type_id, NativeView, View, ViewLifecycleAware, ViewRef,
    ViewStorage,
};

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod model_tests;
