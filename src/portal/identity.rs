//! Mount identifier allocation.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::MountId;

/// Prefix of generated identifiers.
pub const DEFAULT_PREFIX: &str = "relay-target--";

/// First value of the default counter. Starting away from zero keeps
/// generated ids clear of hand-written ones like `target-1`.
pub const DEFAULT_SEED: u64 = 1_123_581_321;

/// Process-wide allocator used by [`create_relay_pair`](super::create_relay_pair).
pub static DEFAULT_ALLOCATOR: IdentityAllocator = IdentityAllocator::new(DEFAULT_PREFIX, DEFAULT_SEED);

/// Issues unique mount identifiers: `prefix` followed by a monotonic counter.
///
/// Uniqueness holds for the lifetime of the allocator (the process, for the
/// default one). Nothing is persisted.
#[derive(Debug)]
pub struct IdentityAllocator {
    prefix: &'static str,
    next: AtomicU64,
}

impl IdentityAllocator {
    /// Create an allocator whose first generated id is `prefix` + `seed`.
    pub const fn new(prefix: &'static str, seed: u64) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(seed),
        }
    }

    /// Return `explicit` unchanged if it is a non-empty id, otherwise
    /// generate the next one.
    ///
    /// Explicit ids do not advance the counter.
    pub fn allocate(&self, explicit: Option<&str>) -> MountId {
        if let Some(id) = explicit.filter(|id| !id.is_empty()) {
            return MountId::from(id);
        }
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        MountId::new(format!("{}{}", self.prefix, n))
    }

    /// The counter value the next generated id will use.
    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdentityAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_SEED)
    }
}
