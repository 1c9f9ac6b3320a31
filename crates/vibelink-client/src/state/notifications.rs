use vibelink_shared::models::Notification;
use vibelink_shared::protocol::Paginated;
use vibelink_shared::types::NotificationId;

/// In-app social notifications. Independent of email notifications.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationsState {
    pub items: Vec<Notification>,
    pub unread_count: usize,
    pub next: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl NotificationsState {
    fn recount(&mut self) {
        self.unread_count = self.items.iter().filter(|n| !n.is_read).count();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationsAction {
    Pending,
    Loaded(Paginated<Notification>),
    MarkedRead(NotificationId),
    AllMarkedRead,
    Deleted(NotificationId),
    AllDeleted,
    /// Delivered out of band (e.g. a push) and not yet fetched.
    Pushed(Notification),
    Failed(String),
}

pub fn reduce(state: &mut NotificationsState, action: NotificationsAction) {
    match action {
        NotificationsAction::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        NotificationsAction::Loaded(page) => {
            state.is_loading = false;
            state.next = page.next;
            state.items = page.results;
        }
        NotificationsAction::MarkedRead(id) => {
            if let Some(n) = state.items.iter_mut().find(|n| n.id == id) {
                n.is_read = true;
            }
        }
        NotificationsAction::AllMarkedRead => {
            for n in &mut state.items {
                n.is_read = true;
            }
        }
        NotificationsAction::Deleted(id) => state.items.retain(|n| n.id != id),
        NotificationsAction::AllDeleted => state.items.clear(),
        NotificationsAction::Pushed(n) => {
            if !state.items.iter().any(|i| i.id == n.id) {
                state.items.insert(0, n);
            }
        }
        NotificationsAction::Failed(message) => {
            state.is_loading = false;
            state.error = Some(message);
        }
    }
    state.recount();
}
