//! Paged list bookkeeping for infinite scroll.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};

use vibelink_shared::models::{Conversation, EmailNotification, Message, Notification, Post};
use vibelink_shared::protocol::Paginated;
use vibelink_shared::types::{ConversationId, EmailNotificationId, MessageId, NotificationId, PostId};

/// Anything with a stable server identity.
pub trait Keyed {
    type Key: Eq + Hash + Copy;
    fn key(&self) -> Self::Key;
}

impl Keyed for Post {
    type Key = PostId;
    fn key(&self) -> PostId {
        self.id
    }
}

impl Keyed for Message {
    type Key = MessageId;
    fn key(&self) -> MessageId {
        self.id
    }
}

impl Keyed for Conversation {
    type Key = ConversationId;
    fn key(&self) -> ConversationId {
        self.id
    }
}

impl Keyed for Notification {
    type Key = NotificationId;
    fn key(&self) -> NotificationId {
        self.id
    }
}

impl Keyed for EmailNotification {
    type Key = EmailNotificationId;
    fn key(&self) -> EmailNotificationId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl<T> From<&Paginated<T>> for PageCursor {
    fn from(page: &Paginated<T>) -> Self {
        Self {
            count: page.count,
            next: page.next.clone(),
            previous: page.previous.clone(),
        }
    }
}

/// A list plus the cursor of the pages loaded into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub cursor: PageCursor,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: PageCursor::default(),
        }
    }
}

impl<T: Keyed> Paged<T> {
    /// First page: replace everything.
    pub fn replace(&mut self, page: Paginated<T>) {
        self.cursor = PageCursor::from(&page);
        self.items = page.results;
    }

    /// Next page: append, skipping items already held.
    pub fn append(&mut self, page: Paginated<T>) {
        self.cursor.count = page.count;
        self.cursor.next = page.next;
        let seen: HashSet<T::Key> = self.items.iter().map(Keyed::key).collect();
        self.items
            .extend(page.results.into_iter().filter(|i| !seen.contains(&i.key())));
    }

    /// Older items (already in display order) go in front.
    pub fn prepend(&mut self, older: Vec<T>, previous: Option<String>) {
        self.cursor.previous = previous;
        let seen: HashSet<T::Key> = self.items.iter().map(Keyed::key).collect();
        let mut merged: Vec<T> = older.into_iter().filter(|i| !seen.contains(&i.key())).collect();
        merged.append(&mut self.items);
        self.items = merged;
    }

    /// Insert or overwrite by key; new items land at the end.
    pub fn upsert(&mut self, item: T) {
        match self.items.iter_mut().find(|i| i.key() == item.key()) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, key: T::Key) -> Option<T> {
        let idx = self.items.iter().position(|i| i.key() == key)?;
        self.cursor.count = self.cursor.count.saturating_sub(1);
        Some(self.items.remove(idx))
    }

    pub fn contains(&self, key: T::Key) -> bool {
        self.items.iter().any(|i| i.key() == key)
    }

    pub fn has_next(&self) -> bool {
        self.cursor.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor.previous.is_some()
    }
}

/// One load-more at a time per list.
#[derive(Debug, Default)]
pub struct LoadGate {
    busy: AtomicBool,
}

impl LoadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another load holds the gate.
    pub fn try_begin(&self) -> Option<LoadGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases its [`LoadGate`] on drop, whatever the load's outcome.
pub struct LoadGuard<'a> {
    gate: &'a LoadGate,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

/// Scroll position captured before prepending older content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnchor {
    pub scroll_height: f64,
    pub offset: f64,
}

impl ScrollAnchor {
    pub fn capture(scroll_height: f64, offset: f64) -> Self {
        Self {
            scroll_height,
            offset,
        }
    }

    /// Offset that keeps the previously visible content in place.
    pub fn restore(&self, new_scroll_height: f64) -> f64 {
        self.offset + (new_scroll_height - self.scroll_height)
    }
}
