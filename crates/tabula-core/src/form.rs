use std::fmt;
use std::hash::Hash;
use std::ops::Deref;

use crate::section::Section;

/// An ordered snapshot of sections: the value the diff engine compares.
///
/// A form is built per state change, handed to the adapter once and then
/// becomes its baseline. Section ids must be unique.
#[derive(Clone)]
pub struct Form<SectionId, RowId> {
    sections: Vec<Section<SectionId, RowId>>,
}

impl<SectionId, RowId> Form<SectionId, RowId>
where
    SectionId: Hash + Eq,
    RowId: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, section: Section<SectionId, RowId>) -> Self {
        self.sections.push(section);
        self
    }

    pub fn sections(&self) -> &[Section<SectionId, RowId>] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section<SectionId, RowId>> {
        self.sections
    }

    pub fn row_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }
}

impl<SectionId, RowId> Default for Form<SectionId, RowId>
where
    SectionId: Hash + Eq,
    RowId: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<SectionId, RowId> Deref for Form<SectionId, RowId> {
    type Target = [Section<SectionId, RowId>];

    fn deref(&self) -> &Self::Target {
        &self.sections
    }
}

impl<SectionId, RowId> From<Vec<Section<SectionId, RowId>>> for Form<SectionId, RowId> {
    fn from(sections: Vec<Section<SectionId, RowId>>) -> Self {
        Self { sections }
    }
}

impl<SectionId, RowId> FromIterator<Section<SectionId, RowId>> for Form<SectionId, RowId> {
    fn from_iter<I: IntoIterator<Item = Section<SectionId, RowId>>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

impl<SectionId, RowId> IntoIterator for Form<SectionId, RowId> {
    type Item = Section<SectionId, RowId>;
    type IntoIter = std::vec::IntoIter<Section<SectionId, RowId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl<SectionId: fmt::Debug, RowId: fmt::Debug> fmt::Debug for Form<SectionId, RowId> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.sections).finish()
    }
}
