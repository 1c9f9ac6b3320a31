use vibelink_shared::error::ApiError;
use vibelink_shared::types::NotificationId;

use crate::api;
use crate::state::{Action, NotificationsAction};
use crate::Client;

fn notifications_failed(message: String) -> Action {
    Action::Notifications(NotificationsAction::Failed(message))
}

impl Client {
    pub async fn load_notifications(&self) -> Result<(), ApiError> {
        self.store
            .dispatch(Action::Notifications(NotificationsAction::Pending));
        let page = api::notifications::list(&self.session)
            .await
            .map_err(|e| self.fail(e, notifications_failed))?;
        self.store
            .dispatch(Action::Notifications(NotificationsAction::Loaded(page)));
        Ok(())
    }

    pub async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ApiError> {
        api::notifications::mark_read(&self.session, id)
            .await
            .map_err(|e| self.fail(e, notifications_failed))?;
        self.store
            .dispatch(Action::Notifications(NotificationsAction::MarkedRead(id)));
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        api::notifications::mark_all_read(&self.session)
            .await
            .map_err(|e| self.fail(e, notifications_failed))?;
        self.store
            .dispatch(Action::Notifications(NotificationsAction::AllMarkedRead));
        Ok(())
    }

    pub async fn delete_notification(&self, id: NotificationId) -> Result<(), ApiError> {
        api::notifications::delete(&self.session, id)
            .await
            .map_err(|e| self.fail(e, notifications_failed))?;
        self.store
            .dispatch(Action::Notifications(NotificationsAction::Deleted(id)));
        Ok(())
    }

    pub async fn delete_all_notifications(&self) -> Result<(), ApiError> {
        api::notifications::delete_all(&self.session)
            .await
            .map_err(|e| self.fail(e, notifications_failed))?;
        self.store
            .dispatch(Action::Notifications(NotificationsAction::AllDeleted));
        Ok(())
    }
}
