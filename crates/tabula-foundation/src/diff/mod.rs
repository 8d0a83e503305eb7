//! Diff engine.
//!
//! [`align`] is the pure identity alignment over id sequences;
//! [`Changeset`] adds content comparison on top of it; and
//! [`SectionedChangeset`] runs both levels over two forms.

mod alignment;
mod changeset;
mod sectioned;

pub use alignment::{align, Alignment};
pub use changeset::{resolve_destinations, Changeset, InvalidUpdate, Move, Mutation};
pub use sectioned::{RowChanges, SectionedChangeset, SupplementChanges};
