//! Pool of idle views keyed by component type.
//!
//! Views scrolled off screen are parked here and handed back out to rows
//! whose component has the same type, so the view does not need to be built
//! again.

use std::fmt::Debug;
use std::hash::Hash;

use tabula_core::collections::map::HashMap;

/// Default number of idle views kept per component type.
pub const DEFAULT_REUSE_VIEW_COUNT: usize = 7;

/// Policy for keeping idle views around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReusePolicy {
    /// Maximum number of idle views kept for each component type.
    pub max_views_per_type: usize,

    /// Whether reuse is enabled.
    pub enabled: bool,
}

impl Default for ReusePolicy {
    fn default() -> Self {
        Self {
            max_views_per_type: DEFAULT_REUSE_VIEW_COUNT,
            enabled: true,
        }
    }
}

impl ReusePolicy {
    pub fn new(max_views_per_type: usize) -> Self {
        Self {
            max_views_per_type,
            enabled: true,
        }
    }

    /// Every enqueued view is dropped; every dequeue misses.
    pub fn disabled() -> Self {
        Self {
            max_views_per_type: 0,
            enabled: false,
        }
    }
}

/// Counters describing pool activity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReuseStats {
    /// Views handed out and not yet returned.
    pub views_in_use: usize,

    /// Idle views waiting in the pool.
    pub views_in_pool: usize,

    /// Views that had to be constructed.
    pub total_created: usize,

    /// Views served from the pool instead of being constructed.
    pub reuse_count: usize,
}

/// Idle views grouped by reuse key.
#[derive(Debug)]
pub struct ReusePool<K, T> {
    available: HashMap<K, Vec<T>>,
    policy: ReusePolicy,
    stats: ReuseStats,
}

impl<K, T> Default for ReusePool<K, T>
where
    K: Hash + Eq + Debug,
{
    fn default() -> Self {
        Self::with_policy(ReusePolicy::default())
    }
}

impl<K, T> ReusePool<K, T>
where
    K: Hash + Eq + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReusePolicy) -> Self {
        Self {
            available: HashMap::default(),
            policy,
            stats: ReuseStats::default(),
        }
    }

    pub fn policy(&self) -> &ReusePolicy {
        &self.policy
    }

    /// Takes an idle view for `key`, if one is parked.
    pub fn dequeue(&mut self, key: &K) -> Option<T> {
        if !self.policy.enabled {
            return None;
        }

        let item = self.available.get_mut(key).and_then(Vec::pop)?;
        self.stats.views_in_pool -= 1;
        self.stats.views_in_use += 1;
        self.stats.reuse_count += 1;
        Some(item)
    }

    /// Records that a view was constructed because the pool had none.
    pub fn record_created(&mut self) {
        self.stats.total_created += 1;
        self.stats.views_in_use += 1;
    }

    /// Parks a view that went off screen. Returns `false` when the view was
    /// dropped because reuse is disabled or the bucket is full.
    pub fn enqueue(&mut self, key: K, item: T) -> bool {
        self.stats.views_in_use = self.stats.views_in_use.saturating_sub(1);
        if !self.policy.enabled {
            return false;
        }

        let bucket = self.available.entry(key).or_default();
        if bucket.len() >= self.policy.max_views_per_type {
            log::trace!(
                "reuse pool full ({} views), dropping idle view",
                bucket.len()
            );
            return false;
        }
        bucket.push(item);
        self.stats.views_in_pool += 1;
        true
    }

    pub fn available_count(&self) -> usize {
        self.stats.views_in_pool
    }

    pub fn available_for(&self, key: &K) -> usize {
        self.available.get(key).map_or(0, Vec::len)
    }

    pub fn stats(&self) -> &ReuseStats {
        &self.stats
    }

    /// Drops every idle view.
    pub fn clear(&mut self) {
        self.available.clear();
        self.stats.views_in_pool = 0;
    }
}
