use tabula_core::{Axis, Supplement};
use tabula_foundation::ReusePolicy;

/// Configuration of a [`TableAdapter`](super::TableAdapter).
#[derive(Clone, Debug, PartialEq)]
pub struct TableAdapterSpec {
    /// Scroll axis. Components are measured bound to the list extent across it.
    pub axis: Axis,
    /// Supplements the adapter serves; others are ignored.
    pub known_supplements: Vec<Supplement>,
    /// Reuse policy shared by the cell and supplement pools.
    pub reuse_policy: ReusePolicy,
    /// Whether estimated size queries fall back to per-type averages.
    pub estimates_sizes: bool,
}

impl Default for TableAdapterSpec {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            known_supplements: vec![Supplement::Header, Supplement::Footer],
            reuse_policy: ReusePolicy::default(),
            estimates_sizes: true,
        }
    }
}

impl TableAdapterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn known_supplements(mut self, supplements: impl IntoIterator<Item = Supplement>) -> Self {
        self.known_supplements = supplements.into_iter().collect();
        self
    }

    pub fn reuse_policy(mut self, policy: ReusePolicy) -> Self {
        self.reuse_policy = policy;
        self
    }

    pub fn estimates_sizes(mut self, enabled: bool) -> Self {
        self.estimates_sizes = enabled;
        self
    }
}
