//! Conversations and the active conversation's messages.
//!
//! Confirmed messages are kept oldest to newest. The server pages them
//! newest-first, so every page is reversed before it is stored. Provisional
//! messages live in their own list and are only merged for display by
//! [`ChatState::visible_messages`], which lets polling rewrite the confirmed
//! list without touching sends still in flight.

use chrono::{DateTime, Utc};

use vibelink_shared::models::{Conversation, LastMessage, Message};
use vibelink_shared::protocol::Paginated;
use vibelink_shared::types::{ConversationId, MessageId};

use crate::pagination::Paged;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub conversations: Vec<Conversation>,
    pub current: Option<Conversation>,
    /// Confirmed messages of the current conversation, chronological.
    pub messages: Paged<Message>,
    pub messages_for: Option<ConversationId>,
    pub provisional: Vec<(ConversationId, Message)>,
    pub is_loading: bool,
    pub is_loading_messages: bool,
    pub is_loading_older: bool,
    pub error: Option<String>,
}

impl ChatState {
    /// Confirmed plus provisional messages of the current conversation.
    pub fn visible_messages(&self) -> Vec<&Message> {
        let Some(current) = self.messages_for else {
            return Vec::new();
        };
        self.messages
            .items
            .iter()
            .chain(
                self.provisional
                    .iter()
                    .filter(|(c, _)| *c == current)
                    .map(|(_, m)| m),
            )
            .collect()
    }

    pub fn total_unread(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread_count).sum()
    }

    fn upsert_to_top(&mut self, conversation: Conversation) {
        self.conversations.retain(|c| c.id != conversation.id);
        self.conversations.insert(0, conversation);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    Pending,
    ConversationsLoaded(Vec<Conversation>),
    ConversationLoaded(Conversation),
    Select(Option<ConversationId>),
    MessagesPending(ConversationId),
    MessagesLoaded {
        conversation: ConversationId,
        page: Paginated<Message>,
    },
    OlderPending,
    OlderLoaded {
        conversation: ConversationId,
        page: Paginated<Message>,
    },
    MessagesPolled {
        conversation: ConversationId,
        page: Paginated<Message>,
    },
    ProvisionalAdded {
        conversation: ConversationId,
        message: Message,
    },
    MessageConfirmed {
        conversation: ConversationId,
        provisional: MessageId,
        message: Message,
    },
    ProvisionalFailed {
        conversation: ConversationId,
        provisional: MessageId,
        error: String,
    },
    ConversationStarted(Conversation),
    MarkedRead(ConversationId),
    Failed(String),
}

fn chronological(mut page: Paginated<Message>) -> Vec<Message> {
    page.results.reverse();
    page.results
}

fn last_message_of(message: &Message) -> LastMessage {
    LastMessage {
        content: message.content.clone(),
        sender: message.sender.username.clone(),
        timestamp: message.created_at.to_rfc3339(),
    }
}

pub fn reduce(state: &mut ChatState, action: ChatAction) {
    match action {
        ChatAction::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        ChatAction::ConversationsLoaded(fresh) => {
            state.is_loading = false;
            // Server order wins; keep local-only entries (just started) after it.
            let local_only: Vec<Conversation> = state
                .conversations
                .drain(..)
                .filter(|c| !fresh.iter().any(|f| f.id == c.id))
                .collect();
            state.conversations = fresh;
            state.conversations.extend(local_only);
            let current_id = state.current.as_ref().map(|c| c.id);
            if let Some(updated) = current_id
                .and_then(|id| state.conversations.iter().find(|c| c.id == id))
                .cloned()
            {
                state.current = Some(updated);
            }
        }
        ChatAction::ConversationLoaded(conversation) => {
            state.is_loading = false;
            match state.conversations.iter_mut().find(|c| c.id == conversation.id) {
                Some(slot) => *slot = conversation.clone(),
                None => state.conversations.insert(0, conversation.clone()),
            }
            state.current = Some(conversation);
        }
        ChatAction::Select(id) => {
            if state.messages_for != id {
                state.messages = Paged::default();
                state.messages_for = id;
            }
            state.current = id.and_then(|id| state.conversations.iter().find(|c| c.id == id).cloned());
        }
        ChatAction::MessagesPending(conversation) => {
            state.is_loading_messages = true;
            state.error = None;
            if state.messages_for != Some(conversation) {
                state.messages = Paged::default();
                state.messages_for = Some(conversation);
            }
        }
        ChatAction::MessagesLoaded { conversation, page } => {
            if state.messages_for != Some(conversation) {
                return;
            }
            state.is_loading_messages = false;
            let cursor = crate::pagination::PageCursor::from(&page);
            state.messages.items = chronological(page);
            state.messages.cursor = cursor;
        }
        ChatAction::OlderPending => {
            state.is_loading_older = true;
        }
        ChatAction::OlderLoaded { conversation, page } => {
            state.is_loading_older = false;
            if state.messages_for != Some(conversation) {
                return;
            }
            let previous = page.previous.clone();
            state.messages.prepend(chronological(page), previous);
        }
        ChatAction::MessagesPolled { conversation, page } => {
            if state.messages_for != Some(conversation) {
                return;
            }
            // Merge, never replace: older pages already loaded must survive.
            for message in chronological(page) {
                state.messages.upsert(message);
            }
            sort_messages(&mut state.messages.items);
        }
        ChatAction::ProvisionalAdded {
            conversation,
            message,
        } => {
            state.provisional.push((conversation, message));
        }
        ChatAction::MessageConfirmed {
            conversation,
            provisional,
            message,
        } => {
            state.provisional.retain(|(_, m)| m.id != provisional);
            let last = last_message_of(&message);
            if state.messages_for == Some(conversation) && !state.messages.contains(message.id) {
                state.messages.items.push(message.clone());
                sort_messages(&mut state.messages.items);
            }
            if let Some(idx) = state.conversations.iter().position(|c| c.id == conversation) {
                let mut convo = state.conversations.remove(idx);
                convo.last_message = Some(last);
                convo.updated_at = Some(message.created_at);
                state.conversations.insert(0, convo);
            }
        }
        ChatAction::ProvisionalFailed {
            provisional, error, ..
        } => {
            state.provisional.retain(|(_, m)| m.id != provisional);
            state.error = Some(error);
        }
        ChatAction::ConversationStarted(conversation) => {
            state.is_loading = false;
            let id = conversation.id;
            state.upsert_to_top(conversation.clone());
            state.current = Some(conversation);
            if state.messages_for != Some(id) {
                state.messages = Paged::default();
                state.messages_for = Some(id);
            }
        }
        ChatAction::MarkedRead(id) => {
            if let Some(c) = state.conversations.iter_mut().find(|c| c.id == id) {
                c.unread_count = 0;
            }
            if let Some(c) = state.current.as_mut().filter(|c| c.id == id) {
                c.unread_count = 0;
            }
            if state.messages_for == Some(id) {
                for m in &mut state.messages.items {
                    m.is_read = true;
                }
            }
        }
        ChatAction::Failed(message) => {
            state.is_loading = false;
            state.is_loading_messages = false;
            state.is_loading_older = false;
            state.error = Some(message);
        }
    }
}

fn sort_messages(items: &mut [Message]) {
    items.sort_by_key(|m| (m.created_at, m.id));
}

/// Placeholder shown while a send is in flight.
pub fn provisional_message(
    id: MessageId,
    sender: vibelink_shared::models::PostUser,
    content: String,
    at: DateTime<Utc>,
) -> Message {
    Message {
        id,
        sender,
        content,
        is_read: true,
        created_at: at,
    }
}
