//! Scroll-proximity trigger.
//!
//! There is one scroll signal for the whole process and it has a single
//! listener slot.  A feed controller claims the slot when it becomes active
//! and gets a [`ScrollSubscription`] back; dropping the subscription frees
//! the slot, so a controller that goes away can never leave a listener
//! behind.

use std::sync::{Arc, Mutex};

/// Distance from the bottom (in rows) at which "near bottom" fires.
pub const NEAR_BOTTOM_THRESHOLD: usize = 5;

/// Which feed a scroll notification is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    TimeDeals,
    BrandDeals,
}

/// Geometry of a scrolled list, all in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub offset: usize,
    pub viewport: usize,
    pub content: usize,
}

impl ScrollMetrics {
    /// `offset + viewport >= content - threshold`, without underflow.
    pub fn is_near_bottom(&self) -> bool {
        self.offset + self.viewport + NEAR_BOTTOM_THRESHOLD >= self.content
    }
}

#[derive(Debug, Default)]
struct Slot {
    next_id: u64,
    listener: Option<(u64, ScrollTarget)>,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollSignal {
    slot: Arc<Mutex<Slot>>,
}

impl ScrollSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the listener slot for `target`, evicting whoever held it.
    pub fn subscribe(&self, target: ScrollTarget) -> ScrollSubscription {
        let mut slot = lock(&self.slot);
        slot.next_id = slot.next_id.wrapping_add(1);
        let id = slot.next_id;
        if let Some((_, previous)) = slot.listener.replace((id, target)) {
            tracing::debug!(?previous, ?target, "scroll listener replaced");
        }
        ScrollSubscription {
            id,
            target,
            slot: Arc::clone(&self.slot),
        }
    }

    /// Feed in the latest scroll geometry.  Returns the listener to notify
    /// when the list is near its bottom.
    pub fn observe(&self, metrics: ScrollMetrics) -> Option<ScrollTarget> {
        if !metrics.is_near_bottom() {
            return None;
        }
        self.listener()
    }

    pub fn listener(&self) -> Option<ScrollTarget> {
        lock(&self.slot).listener.map(|(_, target)| target)
    }
}

/// Proof of holding the listener slot.  Released on drop.
#[derive(Debug)]
pub struct ScrollSubscription {
    id: u64,
    target: ScrollTarget,
    slot: Arc<Mutex<Slot>>,
}

impl ScrollSubscription {
    /// Whether this subscription still owns the slot (it may have been
    /// evicted by a newer one).
    pub fn is_current(&self) -> bool {
        matches!(lock(&self.slot).listener, Some((id, _)) if id == self.id)
    }
}

impl Drop for ScrollSubscription {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        if matches!(slot.listener, Some((id, _)) if id == self.id) {
            slot.listener = None;
            tracing::debug!(listener = ?self.target, "scroll listener released");
        }
    }
}

/// The slot only holds plain data, so a poisoned lock is still usable.
fn lock(slot: &Mutex<Slot>) -> std::sync::MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
