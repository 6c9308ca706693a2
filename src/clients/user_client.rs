//! # User Client
//!
//! Provides a high‑level API for interacting with the `User` actor.
use crate::model::{GeoPoint, Role, User, UserCreate, UserId, UserQuery, UserUpdate};
use crate::user_actor::{UserAction, UserError};
use async_trait::async_trait;
use resource_store::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Debug, Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            other => other
                .into_entity_error::<UserError>()
                .unwrap_or_else(|e| UserError::ActorCommunication(e.to_string())),
        }
    }
}

impl UserClient {
    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_profile(&self, id: UserId, update: UserUpdate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Returns whether presence changed.
    #[instrument(skip(self))]
    pub async fn set_online(&self, id: UserId, online: bool) -> Result<bool, UserError> {
        self.inner
            .perform_action(id, UserAction::SetOnline(online))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_location(&self, id: UserId, point: GeoPoint) -> Result<bool, UserError> {
        self.inner
            .perform_action(id, UserAction::UpdateLocation(point))
            .await
            .map_err(Self::map_error)
    }

    /// Case-insensitive lookup.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let mut found = self.list(UserQuery::ByEmail(email.to_string())).await?;
        Ok(found.pop())
    }

    /// Every supplier account, online or not, in registration order.
    #[instrument(skip(self))]
    pub async fn suppliers(&self) -> Result<Vec<User>, UserError> {
        self.list(UserQuery::ByRole(Role::Supplier)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_store::mock::{create_mock_client, expect_action, expect_list, MockClient};

    #[tokio::test]
    async fn set_online_sends_presence_action() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let users = UserClient::new(client);

        let task = tokio::spawn(async move { users.set_online(UserId(3), true).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, UserId(3));
        assert!(matches!(action, UserAction::SetOnline(true)));
        responder.send(Ok(true)).unwrap();

        assert_eq!(task.await.unwrap(), Ok(true));
    }

    #[tokio::test]
    async fn suppliers_queries_by_role() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let users = UserClient::new(client);

        let task = tokio::spawn(async move { users.suppliers().await });

        let (query, responder) = expect_list(&mut receiver)
            .await
            .expect("Expected List request");
        assert_eq!(query, UserQuery::ByRole(Role::Supplier));
        responder.send(Ok(vec![])).unwrap();

        assert!(task.await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn entity_errors_keep_their_type() {
        let mut mock = MockClient::<User>::new();
        mock.expect_update(UserId(1))
            .return_err(FrameworkError::EntityError(Box::new(UserError::Validation(
                "name must not be empty".into(),
            ))));
        mock.expect_action(UserId(2))
            .return_err(FrameworkError::NotFound("user_2".into()));

        let users = UserClient::new(mock.client());
        assert_eq!(
            users
                .update_profile(UserId(1), UserUpdate::default())
                .await
                .unwrap_err(),
            UserError::Validation("name must not be empty".into())
        );
        assert_eq!(
            users.set_online(UserId(2), true).await.unwrap_err(),
            UserError::NotFound("user_2".into())
        );
        mock.verify();
    }
}
