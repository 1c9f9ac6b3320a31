use chrono::{DateTime, Utc};

use vibelink_shared::models::{DeliveryStatus, EmailNotification};
use vibelink_shared::protocol::{EmailFilter, Paginated};
use vibelink_shared::types::EmailNotificationId;

use crate::pagination::Paged;

/// Email-delivery notifications. Unread means pending or sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailNotificationsState {
    pub list: Paged<EmailNotification>,
    pub current: Option<EmailNotification>,
    pub filter: EmailFilter,
    pub unread_count: usize,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl EmailNotificationsState {
    fn recount(&mut self) {
        self.unread_count = self.list.items.iter().filter(|n| n.is_unread()).count();
    }

    fn patch(&mut self, updated: &EmailNotification) {
        if let Some(slot) = self.list.items.iter_mut().find(|n| n.id == updated.id) {
            *slot = updated.clone();
        }
        if let Some(cur) = self.current.as_mut().filter(|c| c.id == updated.id) {
            *cur = updated.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmailAction {
    Pending,
    Listed {
        filter: EmailFilter,
        page: Paginated<EmailNotification>,
        append: bool,
    },
    Loaded(EmailNotification),
    MarkedRead {
        id: EmailNotificationId,
        at: DateTime<Utc>,
    },
    AllMarkedRead {
        at: DateTime<Utc>,
    },
    Added(EmailNotification),
    Updated(EmailNotification),
    Recount,
    Failed(String),
}

fn mark_delivered(n: &mut EmailNotification, at: DateTime<Utc>) {
    n.status = DeliveryStatus::Delivered;
    n.delivered_at = Some(at);
}

pub fn reduce(state: &mut EmailNotificationsState, action: EmailAction) {
    match action {
        EmailAction::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        EmailAction::Listed {
            filter,
            page,
            append,
        } => {
            state.is_loading = false;
            state.filter = filter;
            if append {
                state.list.append(page);
            } else {
                state.list.replace(page);
            }
        }
        EmailAction::Loaded(n) => {
            state.is_loading = false;
            state.list.upsert(n.clone());
            state.current = Some(n);
        }
        EmailAction::MarkedRead { id, at } => {
            if let Some(n) = state.list.items.iter_mut().find(|n| n.id == id) {
                mark_delivered(n, at);
            }
            if let Some(n) = state.current.as_mut().filter(|n| n.id == id) {
                mark_delivered(n, at);
            }
        }
        EmailAction::AllMarkedRead { at } => {
            for n in state.list.items.iter_mut().filter(|n| n.is_unread()) {
                mark_delivered(n, at);
            }
            if let Some(n) = state.current.as_mut().filter(|n| n.is_unread()) {
                mark_delivered(n, at);
            }
        }
        EmailAction::Added(n) => {
            if !state.list.contains(n.id) {
                state.list.items.insert(0, n);
                state.list.cursor.count += 1;
            }
        }
        EmailAction::Updated(n) => state.patch(&n),
        EmailAction::Recount => {}
        EmailAction::Failed(message) => {
            state.is_loading = false;
            state.error = Some(message);
        }
    }
    state.recount();
}
