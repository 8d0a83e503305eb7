//! Hash collections used across Tabula.
//!
//! Ids are hashed on every diff, so maps default to the Fx hasher. The
//! `std-hash` feature switches back to the std hashers.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{HashMap, HashSet};

    /// Insertion-ordered map.
    pub type OrderedMap<K, V> = indexmap::IndexMap<K, V>;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

    /// Insertion-ordered map.
    pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
}
