//! # ActorClient Trait
//!
//! Common surface for domain clients: `get`, `delete`, `list` and `subscribe` come for free
//! once a client exposes its inner [`ResourceClient`] and says how to map framework errors.
use crate::{ActorEntity, FrameworkError, ResourceClient, Subscription};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard operations.
///
/// ```rust
/// use resource_store::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug, PartialEq)] struct Tank { id: u32 }
/// #[derive(Debug)] struct TankCreate;
/// #[derive(Debug)] struct TankUpdate;
/// #[derive(Debug)] enum TankAction {}
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct TankError(String);
/// impl From<String> for TankError { fn from(s: String) -> Self { TankError(s) } }
///
/// #[async_trait]
/// impl ActorEntity for Tank {
///     type Id = u32; type Create = TankCreate; type Update = TankUpdate;
///     type Action = TankAction; type ActionResult = (); type Query = ();
///     type Context = (); type Error = TankError;
///     fn from_create_params(id: u32, _: TankCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
///     fn id(&self) -> &u32 { &self.id }
///     fn matches(&self, _: &()) -> bool { true }
///     async fn on_update(&mut self, _: TankUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: TankAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct TankClient { inner: ResourceClient<Tank> }
///
/// #[async_trait]
/// impl ActorClient<Tank> for TankClient {
///     type Error = TankError;
///     fn inner(&self) -> &ResourceClient<Tank> { &self.inner }
///     fn map_error(e: FrameworkError) -> Self::Error { TankError(e.to_string()) }
/// }
///
/// async fn usage(client: TankClient) {
///     let _ = client.get(1).await;
///     let _ = client.list(()).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// Every entity matching `query`.
    #[tracing::instrument(skip(self))]
    async fn list(&self, query: T::Query) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(query).await.map_err(Self::map_error)
    }

    /// Open a live query on `query`.
    #[tracing::instrument(skip(self))]
    async fn subscribe(&self, query: T::Query) -> Result<Subscription<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().subscribe(query).await.map_err(Self::map_error)
    }
}
