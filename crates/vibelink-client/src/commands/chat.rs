use std::collections::BTreeMap;

use chrono::Utc;

use vibelink_shared::error::{ApiError, FieldErrors};
use vibelink_shared::models::{Conversation, DiscoverUser, Message, PostUser};
use vibelink_shared::types::{ConversationId, UserId};

use crate::api;
use crate::discovery::conversation_opener;
use crate::polling::{spawn_poller, ViewScope};
use crate::state::chat::provisional_message;
use crate::state::{Action, ChatAction};
use crate::Client;

fn chat_failed(message: String) -> Action {
    Action::Chat(ChatAction::Failed(message))
}

impl Client {
    pub async fn load_conversations(&self) -> Result<(), ApiError> {
        self.store.dispatch(Action::Chat(ChatAction::Pending));
        self.refresh_conversations().await
    }

    /// Re-fetch the conversation list without the loading flag. Used by
    /// polling.
    pub async fn refresh_conversations(&self) -> Result<(), ApiError> {
        let page = api::chat::conversations(&self.session, None)
            .await
            .map_err(|e| self.fail(e, chat_failed))?;
        self.store
            .dispatch(Action::Chat(ChatAction::ConversationsLoaded(page.results)));
        Ok(())
    }

    pub async fn load_conversation(&self, id: ConversationId) -> Result<Conversation, ApiError> {
        self.store.dispatch(Action::Chat(ChatAction::Pending));
        let conversation = api::chat::conversation(&self.session, id)
            .await
            .map_err(|e| self.fail(e, chat_failed))?;
        self.store.dispatch(Action::Chat(ChatAction::ConversationLoaded(
            conversation.clone(),
        )));
        Ok(conversation)
    }

    /// Make `id` the active conversation and load its newest messages.
    pub async fn open_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
        self.store
            .dispatch(Action::Chat(ChatAction::Select(Some(id))));
        self.store
            .dispatch(Action::Chat(ChatAction::MessagesPending(id)));
        let page = api::chat::messages(&self.session, id, None)
            .await
            .map_err(|e| self.fail(e, chat_failed))?;
        self.store.dispatch(Action::Chat(ChatAction::MessagesLoaded {
            conversation: id,
            page,
        }));
        Ok(())
    }

    pub fn close_conversation(&self) {
        self.store.dispatch(Action::Chat(ChatAction::Select(None)));
    }

    /// Prepend the previous page of the active conversation. `Ok(false)`
    /// when there is no older page or a load is already running.
    pub async fn load_older_messages(&self) -> Result<bool, ApiError> {
        let Some(_guard) = self.gates.older_messages.try_begin() else {
            return Ok(false);
        };
        let (conversation, previous) = self.store.read(|s| {
            (
                s.chat.messages_for,
                s.chat.messages.cursor.previous.clone(),
            )
        });
        let (Some(conversation), Some(previous)) = (conversation, previous) else {
            return Ok(false);
        };

        self.store.dispatch(Action::Chat(ChatAction::OlderPending));
        let page = api::chat::messages(&self.session, conversation, Some(&previous))
            .await
            .map_err(|e| self.fail(e, chat_failed))?;
        self.store
            .dispatch(Action::Chat(ChatAction::OlderLoaded { conversation, page }));
        Ok(true)
    }

    /// Merge the newest page of `id` into the held messages.
    pub async fn poll_messages(&self, id: ConversationId) -> Result<(), ApiError> {
        let page = api::chat::messages(&self.session, id, None)
            .await
            .map_err(|e| self.fail(e, chat_failed))?;
        self.store.dispatch(Action::Chat(ChatAction::MessagesPolled {
            conversation: id,
            page,
        }));
        Ok(())
    }

    /// Send with an immediate placeholder. The placeholder is swapped for
    /// the server's message on success and dropped on failure.
    pub async fn send_message(&self, conversation: ConversationId, content: &str) -> Result<Message, ApiError> {
        let content = content.trim();
        if content.is_empty() {
            let mut fields = BTreeMap::new();
            fields.insert("content".to_string(), vec!["Message cannot be empty".to_string()]);
            return Err(ApiError::Validation(FieldErrors(fields)));
        }

        let sender = self.store.read(|s| {
            s.auth.user.as_ref().map(|u| PostUser {
                id: u.id,
                username: u.username.clone(),
                full_name: u.full_name.clone(),
                profile_photo: u.profile_photo.clone(),
                is_following: false,
            })
        });
        let sender = sender.unwrap_or(PostUser {
            id: UserId(0),
            username: String::new(),
            full_name: String::new(),
            profile_photo: None,
            is_following: false,
        });

        let provisional = self.ids.next();
        self.store.dispatch(Action::Chat(ChatAction::ProvisionalAdded {
            conversation,
            message: provisional_message(provisional, sender, content.to_string(), Utc::now()),
        }));
        tracing::debug!(%conversation, %provisional, "sending message");

        match api::chat::send(&self.session, conversation, content).await {
            Ok(message) => {
                tracing::info!(%conversation, message = %message.id, "message sent");
                self.store.dispatch(Action::Chat(ChatAction::MessageConfirmed {
                    conversation,
                    provisional,
                    message: message.clone(),
                }));
                Ok(message)
            }
            Err(e) if e.is_session_fatal() => Err(self.fail(e, chat_failed)),
            Err(e) => {
                tracing::warn!(%conversation, %provisional, error = %e, "send failed, dropping placeholder");
                self.store.dispatch(Action::Chat(ChatAction::ProvisionalFailed {
                    conversation,
                    provisional,
                    error: e.user_message(),
                }));
                Err(e)
            }
        }
    }

    /// Open (or create) the conversation with `user`; it becomes current.
    pub async fn start_conversation(&self, user: UserId) -> Result<Conversation, ApiError> {
        self.store.dispatch(Action::Chat(ChatAction::Pending));
        let conversation = api::chat::start(&self.session, user)
            .await
            .map_err(|e| self.fail(e, chat_failed))?;
        self.store.dispatch(Action::Chat(ChatAction::ConversationStarted(
            conversation.clone(),
        )));
        Ok(conversation)
    }

    /// Start a conversation with a discovery candidate and send an opener.
    pub async fn message_candidate(&self, candidate: &DiscoverUser) -> Result<Conversation, ApiError> {
        let conversation = self.start_conversation(candidate.id).await?;
        self.send_message(conversation.id, &conversation_opener(candidate))
            .await?;
        Ok(conversation)
    }

    pub async fn mark_conversation_read(&self, id: ConversationId) -> Result<(), ApiError> {
        api::chat::mark_read(&self.session, id)
            .await
            .map_err(|e| self.fail(e, chat_failed))?;
        self.store.dispatch(Action::Chat(ChatAction::MarkedRead(id)));
        Ok(())
    }

    /// Keep the conversation list fresh while the returned scope lives.
    pub fn watch_conversations(&self) -> ViewScope {
        let scope = ViewScope::child_of(&self.shutdown);
        let client = self.clone();
        spawn_poller(self.config.poll_interval, scope.token(), move || {
            let client = client.clone();
            async move {
                if let Err(e) = client.refresh_conversations().await {
                    tracing::debug!(error = %e, "conversation poll failed");
                }
            }
        });
        scope
    }

    /// Keep the messages of `id` fresh while the returned scope lives.
    pub fn watch_messages(&self, id: ConversationId) -> ViewScope {
        let scope = ViewScope::child_of(&self.shutdown);
        let client = self.clone();
        spawn_poller(self.config.poll_interval, scope.token(), move || {
            let client = client.clone();
            async move {
                if let Err(e) = client.poll_messages(id).await {
                    tracing::debug!(conversation = %id, error = %e, "message poll failed");
                }
            }
        });
        scope
    }
}
