//! Provisional identities and rollback snapshots for optimistic updates.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use vibelink_shared::types::MessageId;

/// Negative, strictly decreasing ids for client-side placeholders.
///
/// Seeded from the wall clock so ids from one run never repeat those of an
/// earlier one; two sends in the same millisecond still get distinct ids.
#[derive(Debug)]
pub struct ProvisionalIds {
    last: AtomicI64,
}

impl Default for ProvisionalIds {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisionalIds {
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    pub fn next(&self) -> MessageId {
        let now = -Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.min(current - 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return MessageId(candidate),
                Err(actual) => current = actual,
            }
        }
    }
}

/// Like/share state before an optimistic flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleSnapshot {
    pub active: bool,
    pub count: u32,
}

impl ToggleSnapshot {
    /// The flipped state shown while the request is in flight.
    pub fn flipped(self) -> Self {
        Self {
            active: !self.active,
            count: if self.active {
                self.count.saturating_sub(1)
            } else {
                self.count + 1
            },
        }
    }
}

/// Follow state of a candidate before an optimistic flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowSnapshot {
    pub is_following: bool,
    pub followers_count: u32,
}

impl FollowSnapshot {
    pub fn flipped(self) -> Self {
        let t = ToggleSnapshot {
            active: self.is_following,
            count: self.followers_count,
        }
        .flipped();
        Self {
            is_following: t.active,
            followers_count: t.count,
        }
    }
}
