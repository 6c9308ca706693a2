//! ActorEntity implementation for [`Notification`].

use super::error::NotificationError;
use crate::clients::UserClient;
use crate::model::{
    Notification, NotificationCreate, NotificationId, NotificationQuery, NotificationUpdate,
};
use async_trait::async_trait;
use chrono::Utc;
use resource_store::{ActorClient, ActorEntity};

/// Custom actions for Notification entities.
#[derive(Debug, Clone)]
pub enum NotificationAction {
    /// Sets `read`. Returns `false` if it already was.
    MarkRead,
}

#[async_trait]
impl ActorEntity for Notification {
    type Id = NotificationId;
    type Create = NotificationCreate;
    type Update = NotificationUpdate;
    type Action = NotificationAction;
    type ActionResult = bool;
    type Query = NotificationQuery;
    type Context = UserClient;
    type Error = NotificationError;

    fn from_create_params(
        id: NotificationId,
        params: NotificationCreate,
    ) -> Result<Self, Self::Error> {
        if params.title.trim().is_empty() {
            return Err(NotificationError::Validation(
                "title must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            title: params.title,
            body: params.body,
            read: false,
            related_order_id: params.related_order_id,
            created_at: Utc::now(),
        })
    }

    fn id(&self) -> &NotificationId {
        &self.id
    }

    fn matches(&self, query: &NotificationQuery) -> bool {
        match query {
            NotificationQuery::ForUser(user) => self.user_id == *user,
            NotificationQuery::UnreadFor(user) => self.user_id == *user && !self.read,
            NotificationQuery::ForOrder(order) => self.related_order_id == Some(*order),
        }
    }

    /// Every notification must address an existing user.
    async fn on_create(&mut self, users: &UserClient) -> Result<(), Self::Error> {
        match users.get(self.user_id).await? {
            Some(_) => Ok(()),
            None => Err(NotificationError::UnknownRecipient(self.user_id.to_string())),
        }
    }

    async fn on_update(
        &mut self,
        update: NotificationUpdate,
        _users: &UserClient,
    ) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: NotificationAction,
        _users: &UserClient,
    ) -> Result<bool, Self::Error> {
        match action {
            NotificationAction::MarkRead => {
                let changed = !self.read;
                self.read = true;
                Ok(changed)
            }
        }
    }
}
