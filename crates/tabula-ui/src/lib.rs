//! Native-list integration for Tabula.
//!
//! A [`ListHost`] is the native list control. [`TableAdapter`] feeds it from
//! successive forms: it diffs each new snapshot against the previous one,
//! emits the resulting [`BatchUpdate`], and answers the host's lazy queries
//! with recycled [`ContainerCell`]s and [`HeaderFooterView`]s.

mod adapter;
mod containers;
mod host;
mod reusable_view;

pub use adapter::{
    batch_update, RowAction, RowActionStyle, SizeLookup, TableAdapter, TableAdapterSpec,
    ABSENT_SUPPLEMENT_EXTENT,
};
pub use containers::{ContainerCell, HeaderFooterView};
pub use host::{
    BatchUpdate, ContainerKind, ContentView, ListHost, ListMetrics, ListOperation, RowAnimation,
    TableViewAnimation,
};
pub use reusable_view::{ReusableView, ViewBinding, CROSS_FADE_DURATION};
