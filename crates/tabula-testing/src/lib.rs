//! Test tooling for Tabula lists.
//!
//! [`TableHarness`] wires a [`TableAdapter`](tabula_ui::TableAdapter) to a
//! recording [`TestListHost`] and asserts after every update that the
//! emitted operations agree with the adapter's new row counts. The
//! [`components`] module holds small renderables covering each capability.

pub mod components;
mod harness;
mod host;

pub use harness::TableHarness;
pub use host::{ContentViewState, EndedViews, TestContentView, TestListHost};

pub mod prelude {
    pub use crate::components::*;
    pub use crate::{TableHarness, TestListHost};
}
