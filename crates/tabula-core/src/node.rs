use std::fmt;
use std::hash::Hash;

use crate::any_renderable::AnyRenderable;
use crate::geometry::{EdgeInsets, Size, SizeConstraint};

/// A row: a stable identifier plus the component that renders it.
///
/// Nodes are immutable; a row whose content changes is replaced wholesale
/// by a node with the same id.
#[derive(Clone)]
pub struct Node<Id> {
    pub id: Id,
    pub component: AnyRenderable,
}

impl<Id: Hash + Eq> Node<Id> {
    pub fn new(id: Id, component: impl Into<AnyRenderable>) -> Self {
        Self {
            id,
            component: component.into(),
        }
    }

    pub fn component_as<T: 'static>(&self) -> Option<&T> {
        self.component.downcast_ref::<T>()
    }

    pub fn size_bound_to(&self, constraint: SizeConstraint, inherited_margins: EdgeInsets) -> Size {
        self.component.size_bound_to(constraint, inherited_margins)
    }
}

impl<Id: PartialEq> PartialEq for Node<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.component == other.component
    }
}

impl<Id: fmt::Debug> fmt::Debug for Node<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:?}; {}>", self.id, self.component.component_type_name())
    }
}
