//! # Notification Client
//!
//! Inbox operations: write, mark read, count unread.
use crate::model::{Notification, NotificationCreate, NotificationId, NotificationQuery, UserId};
use crate::notification_actor::{NotificationAction, NotificationError};
use async_trait::async_trait;
use resource_store::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
}

impl NotificationClient {
    pub fn new(inner: ResourceClient<Notification>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Notification> for NotificationClient {
    type Error = NotificationError;

    fn inner(&self) -> &ResourceClient<Notification> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => NotificationError::NotFound(id),
            other => other
                .into_entity_error::<NotificationError>()
                .unwrap_or_else(|e| NotificationError::ActorCommunication(e.to_string())),
        }
    }
}

impl NotificationClient {
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id, title = %notification.title))]
    pub async fn notify(
        &self,
        notification: NotificationCreate,
    ) -> Result<NotificationId, NotificationError> {
        debug!("Sending request");
        self.inner
            .create(notification)
            .await
            .map_err(Self::map_error)
    }

    /// Returns `false` if the notification was already read.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: NotificationId) -> Result<bool, NotificationError> {
        self.inner
            .perform_action(id, NotificationAction::MarkRead)
            .await
            .map_err(Self::map_error)
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<Notification>, NotificationError> {
        let mut inbox = self.list(NotificationQuery::ForUser(user_id)).await?;
        inbox.reverse();
        Ok(inbox)
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: UserId) -> Result<usize, NotificationError> {
        Ok(self.list(NotificationQuery::UnreadFor(user_id)).await?.len())
    }
}
