//! # Generic Actor Server
//!
//! `ResourceActor` owns one collection of documents and processes every request for it
//! sequentially, so the collection needs no locking. After each mutation it fans the
//! resulting [`Change`] out to the live queries registered with `Subscribe`.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::subscription::{Change, Subscriber, Subscription};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor (server) and a client.
/// 2.  **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop on a Tokio task.
///
/// ```rust
/// use resource_store::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug, PartialEq)] struct Tank { id: u32, liters: u32 }
/// #[derive(Debug)] struct TankCreate { liters: u32 }
/// #[derive(Debug)] struct TankUpdate;
/// #[derive(Debug)] enum TankAction {}
/// #[derive(Debug, thiserror::Error)] #[error("tank error")] struct TankError;
///
/// #[async_trait]
/// impl ActorEntity for Tank {
///     type Id = u32;
///     type Create = TankCreate;
///     type Update = TankUpdate;
///     type Action = TankAction;
///     type ActionResult = ();
///     type Query = ();
///     type Context = ();
///     type Error = TankError;
///
///     fn from_create_params(id: u32, p: TankCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, liters: p.liters })
///     }
///     fn id(&self) -> &u32 { &self.id }
///     fn matches(&self, _: &()) -> bool { true }
///     async fn on_update(&mut self, _: TankUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: TankAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Tank>::new(10);
///     tokio::spawn(actor.run(()));
///     let id = client.create(TankCreate { liters: 500 }).await.unwrap();
///     assert_eq!(client.list(()).await.unwrap()[0].id, id);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: allocate the next id, `from_create_params`, `on_create`, insert, publish.
/// * **Get**: clone of the stored entity, or `None`.
/// * **Update** / **Action**: run the hook on the stored entity, then publish the difference.
/// * **Delete**: `on_delete`, remove, publish `Removed`.
/// * **List**: clones of every match, in id order.
/// * **Subscribe**: push the current matches as `Added`, then register the query.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    subscribers: Vec<Subscriber<T>>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` bounds the request queue; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            subscribers: Vec::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// `context` is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "Order" instead of "agua_expressa::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.publish(&id, None, Some(&item));
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let before = item.clone();
                    if let Err(e) = item.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        // roll back a half-applied update
                        *item = before;
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    let after = item.clone();
                    self.publish(&id, Some(&before), Some(&after));
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(after));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if let Some(removed) = self.store.remove(&id) {
                        self.publish(&id, Some(&removed), None);
                    }
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let before = item.clone();
                    let result = item.handle_action(action, &context).await;
                    match result {
                        Ok(value) => {
                            let after = item.clone();
                            self.publish(&id, Some(&before), Some(&after));
                            info!(entity_type, %id, "Action ok");
                            let _ = respond_to.send(Ok(value));
                        }
                        Err(e) => {
                            *item = before;
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::List { query, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&query))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?query, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Subscribe { query, respond_to } => {
                    let (sender, receiver) = mpsc::unbounded_channel();
                    let mut initial = 0;
                    for item in self.store.values().filter(|item| item.matches(&query)) {
                        let _ = sender.send(Change::Added(item.clone()));
                        initial += 1;
                    }
                    debug!(entity_type, ?query, initial, "Subscribe");
                    self.subscribers.push(Subscriber { query, sender });
                    let _ = respond_to.send(Ok(Subscription::new(receiver)));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    /// Sends the change between `before` and `after` to every interested subscriber,
    /// dropping subscribers whose receiving end is gone.
    fn publish(&mut self, id: &T::Id, before: Option<&T>, after: Option<&T>) {
        self.subscribers.retain(|subscriber| {
            match Change::between(id, before, after, &subscriber.query) {
                Some(change) => subscriber.sender.send(change).is_ok(),
                None => !subscriber.sender.is_closed(),
            }
        });
    }
}
