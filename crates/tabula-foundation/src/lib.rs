//! Diffing and caching machinery for Tabula lists.
//!
//! - [`diff`] - identity alignment, flat changesets and the two-level
//!   [`SectionedChangeset`] over forms
//! - [`ReusePool`] - idle views keyed by component type
//! - [`SizeCache`] - measured sizes that follow rows across updates

pub mod diff;
mod reuse_pool;
mod size_cache;

pub use diff::{Changeset, SectionedChangeset};
pub use reuse_pool::*;
pub use size_cache::*;

#[cfg(test)]
#[path = "tests/sectioned_diff_tests.rs"]
mod sectioned_diff_tests;
