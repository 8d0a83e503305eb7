use std::fmt;
use std::hash::Hash;

use crate::any_renderable::AnyRenderable;
use crate::collections::map::OrderedMap;
use crate::geometry::{EdgeInsets, Size, SizeConstraint};
use crate::node::Node;

/// Section-level renderables that are not rows.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Supplement {
    Header,
    Footer,
    Custom(String),
}

impl Supplement {
    pub fn custom(name: impl Into<String>) -> Self {
        Supplement::Custom(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Supplement::Header => "header",
            Supplement::Footer => "footer",
            Supplement::Custom(name) => name,
        }
    }
}

/// An identified, ordered group of rows with optional supplements.
///
/// Row ids must be unique within the section.
#[derive(Clone)]
pub struct Section<SectionId, RowId> {
    pub id: SectionId,
    pub rows: Vec<Node<RowId>>,
    pub supplements: OrderedMap<Supplement, AnyRenderable>,
}

impl<SectionId, RowId> Section<SectionId, RowId>
where
    SectionId: Hash + Eq,
    RowId: Hash + Eq,
{
    pub fn new(id: SectionId) -> Self {
        Self {
            id,
            rows: Vec::new(),
            supplements: OrderedMap::default(),
        }
    }

    pub fn with_rows(id: SectionId, rows: impl IntoIterator<Item = Node<RowId>>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            ..Self::new(id)
        }
    }

    pub fn header(self, component: impl Into<AnyRenderable>) -> Self {
        self.adding(Supplement::Header, component)
    }

    pub fn footer(self, component: impl Into<AnyRenderable>) -> Self {
        self.adding(Supplement::Footer, component)
    }

    pub fn adding(mut self, supplement: Supplement, component: impl Into<AnyRenderable>) -> Self {
        self.supplements.insert(supplement, component.into());
        self
    }

    pub fn removing(mut self, supplement: &Supplement) -> Self {
        self.supplements.shift_remove(supplement);
        self
    }

    /// Appends a row.
    pub fn row(mut self, id: RowId, component: impl Into<AnyRenderable>) -> Self {
        self.rows.push(Node::new(id, component));
        self
    }

    pub fn node(mut self, node: Node<RowId>) -> Self {
        self.rows.push(node);
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = Node<RowId>>) -> Self {
        self.rows.extend(nodes);
        self
    }

    pub fn has(&self, supplement: &Supplement) -> bool {
        self.supplements.contains_key(supplement)
    }

    pub fn supplement(&self, supplement: &Supplement) -> Option<&AnyRenderable> {
        self.supplements.get(supplement)
    }

    /// Typed access to a supplement's component.
    pub fn component<T: 'static>(&self, supplement: &Supplement) -> Option<&T> {
        self.supplements
            .get(supplement)
            .and_then(|component| component.downcast_ref::<T>())
    }

    pub fn component_size(
        &self,
        supplement: &Supplement,
        constraint: SizeConstraint,
        inherited_margins: EdgeInsets,
    ) -> Option<Size> {
        self.supplements
            .get(supplement)
            .map(|component| component.size_bound_to(constraint, inherited_margins))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<SectionId: fmt::Debug, RowId: fmt::Debug> fmt::Debug for Section<SectionId, RowId> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:?};", self.id)?;
        for (supplement, component) in &self.supplements {
            write!(
                f,
                " {} = {};",
                supplement.name(),
                component.component_type_name()
            )?;
        }
        for row in &self.rows {
            write!(f, " {:?}", row)?;
        }
        f.write_str(">")
    }
}
