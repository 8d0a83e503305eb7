//! Row and supplement containers.

use std::fmt;

use crate::host::ContentView;
use crate::reusable_view::{ReusableView, ViewBinding};

/// A recyclable row.
pub struct ContainerCell {
    binding: ViewBinding,
}

impl ContainerCell {
    pub fn new(content_view: Box<dyn ContentView>) -> Self {
        Self {
            binding: ViewBinding::new(content_view),
        }
    }
}

impl ReusableView for ContainerCell {
    fn binding(&self) -> &ViewBinding {
        &self.binding
    }
}

impl fmt::Debug for ContainerCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerCell")
            .field("component", &self.binding.component())
            .field("on_screen", &self.binding.is_on_screen())
            .finish()
    }
}

/// A recyclable header, footer or custom supplement.
pub struct HeaderFooterView {
    binding: ViewBinding,
}

impl HeaderFooterView {
    pub fn new(content_view: Box<dyn ContentView>) -> Self {
        Self {
            binding: ViewBinding::new(content_view),
        }
    }
}

impl ReusableView for HeaderFooterView {
    fn binding(&self) -> &ViewBinding {
        &self.binding
    }
}

impl fmt::Debug for HeaderFooterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderFooterView")
            .field("component", &self.binding.component())
            .field("on_screen", &self.binding.is_on_screen())
            .finish()
    }
}
