use chrono::Utc;

use vibelink_shared::error::ApiError;
use vibelink_shared::models::EmailNotification;
use vibelink_shared::protocol::{Ack, EmailFilter, NewEmailNotification};
use vibelink_shared::types::EmailNotificationId;

use crate::api;
use crate::state::{Action, EmailAction};
use crate::Client;

fn email_failed(message: String) -> Action {
    Action::EmailNotifications(EmailAction::Failed(message))
}

impl Client {
    /// First page for `filter`, replacing the held list.
    pub async fn load_email_notifications(&self, filter: EmailFilter) -> Result<(), ApiError> {
        self.store
            .dispatch(Action::EmailNotifications(EmailAction::Pending));
        let filter = EmailFilter { page: None, ..filter };
        let page = api::email_notifications::list(&self.session, &filter)
            .await
            .map_err(|e| self.fail(e, email_failed))?;
        self.store
            .dispatch(Action::EmailNotifications(EmailAction::Listed {
                filter,
                page,
                append: false,
            }));
        Ok(())
    }

    /// Append the next page under the current filter.
    pub async fn load_more_email_notifications(&self) -> Result<bool, ApiError> {
        let Some(_guard) = self.gates.email.try_begin() else {
            return Ok(false);
        };
        let (filter, next) = self.store.read(|s| {
            let held = &s.email_notifications;
            (held.filter.clone(), held.list.cursor.next.clone())
        });
        // The list endpoint reports the next page as a bare number.
        let Some(next) = next.and_then(|n| n.parse::<u32>().ok()) else {
            return Ok(false);
        };

        let filter = EmailFilter {
            page: Some(next),
            ..filter
        };
        let page = api::email_notifications::list(&self.session, &filter)
            .await
            .map_err(|e| self.fail(e, email_failed))?;
        self.store
            .dispatch(Action::EmailNotifications(EmailAction::Listed {
                filter,
                page,
                append: true,
            }));
        Ok(true)
    }

    pub async fn load_email_notification(&self, id: EmailNotificationId) -> Result<EmailNotification, ApiError> {
        self.store
            .dispatch(Action::EmailNotifications(EmailAction::Pending));
        let notification = api::email_notifications::detail(&self.session, id)
            .await
            .map_err(|e| self.fail(e, email_failed))?;
        self.store
            .dispatch(Action::EmailNotifications(EmailAction::Loaded(
                notification.clone(),
            )));
        Ok(notification)
    }

    pub async fn mark_email_notification_read(&self, id: EmailNotificationId) -> Result<(), ApiError> {
        api::email_notifications::mark_read(&self.session, id)
            .await
            .map_err(|e| self.fail(e, email_failed))?;
        self.store
            .dispatch(Action::EmailNotifications(EmailAction::MarkedRead {
                id,
                at: Utc::now(),
            }));
        Ok(())
    }

    pub async fn mark_all_email_notifications_read(&self) -> Result<(), ApiError> {
        api::email_notifications::mark_all_read(&self.session)
            .await
            .map_err(|e| self.fail(e, email_failed))?;
        self.store
            .dispatch(Action::EmailNotifications(EmailAction::AllMarkedRead {
                at: Utc::now(),
            }));
        Ok(())
    }

    /// Ask the server to mail a test notification, then reload the list so
    /// the new record shows up.
    pub async fn send_test_email_notification(&self) -> Result<Ack, ApiError> {
        let ack = api::email_notifications::send_test(&self.session)
            .await
            .map_err(|e| self.fail(e, email_failed))?;
        tracing::info!(notification = ?ack.notification_id, "test notification sent");
        let filter = self.store.read(|s| s.email_notifications.filter.clone());
        self.load_email_notifications(filter).await?;
        Ok(ack)
    }

    pub async fn create_email_notification(
        &self,
        notification: NewEmailNotification,
    ) -> Result<EmailNotification, ApiError> {
        let created = api::email_notifications::create(&self.session, &notification)
            .await
            .map_err(|e| self.fail(e, email_failed))?;
        self.store
            .dispatch(Action::EmailNotifications(EmailAction::Added(
                created.clone(),
            )));
        Ok(created)
    }
}
