//! # Resource Store
//!
//! A small document store built on the actor model. Every collection (users, orders,
//! notifications) is owned by one [`ResourceActor`] running on its own Tokio task; the rest
//! of the program talks to it through a cloneable [`ResourceClient`].
//!
//! Besides single-document CRUD the store answers two collection-level requests:
//!
//! - **List**: a one-off query over the collection, filtered by [`ActorEntity::matches`].
//! - **Subscribe**: a live query. The subscriber receives the current matches and then only
//!   the incremental [`Change`]s, which a [`LiveView`] folds into a local map.
//!
//! ## Layers
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain types, validation and cross-collection hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing and change fan-out
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe requests
//!
//! ## Context Injection
//!
//! Dependencies are handed to `run()`, not `new()`. All actors are created first, then each
//! one is started with the clients it needs:
//!
//! ```rust
//! use resource_store::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)] struct Supplier { id: u32 }
//! #[derive(Debug)] struct SupplierCreate;
//! #[derive(Debug)] struct SupplierUpdate;
//! #[derive(Debug)] enum SupplierAction {}
//! #[derive(Debug, thiserror::Error)] #[error("supplier error")] struct SupplierError;
//!
//! #[async_trait]
//! impl ActorEntity for Supplier {
//!     type Id = u32; type Create = SupplierCreate; type Update = SupplierUpdate;
//!     type Action = SupplierAction; type ActionResult = (); type Query = ();
//!     type Context = (); type Error = SupplierError;
//!     fn from_create_params(id: u32, _: SupplierCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     fn id(&self) -> &u32 { &self.id }
//!     fn matches(&self, _: &()) -> bool { true }
//!     async fn on_update(&mut self, _: SupplierUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: SupplierAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[derive(Clone, Debug, PartialEq)] struct Delivery { id: u32, supplier: u32 }
//! #[derive(Debug)] struct DeliveryCreate { supplier: u32 }
//! #[derive(Debug)] struct DeliveryUpdate;
//! #[derive(Debug)] enum DeliveryAction {}
//! #[derive(Debug, thiserror::Error)] #[error("unknown supplier")] struct DeliveryError;
//!
//! #[async_trait]
//! impl ActorEntity for Delivery {
//!     type Id = u32; type Create = DeliveryCreate; type Update = DeliveryUpdate;
//!     type Action = DeliveryAction; type ActionResult = (); type Query = ();
//!     type Context = ResourceClient<Supplier>; type Error = DeliveryError;
//!     fn from_create_params(id: u32, p: DeliveryCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, supplier: p.supplier })
//!     }
//!     fn id(&self) -> &u32 { &self.id }
//!     fn matches(&self, _: &()) -> bool { true }
//!     async fn on_create(&mut self, suppliers: &ResourceClient<Supplier>) -> Result<(), Self::Error> {
//!         match suppliers.get(self.supplier).await {
//!             Ok(Some(_)) => Ok(()),
//!             _ => Err(DeliveryError),
//!         }
//!     }
//!     async fn on_update(&mut self, _: DeliveryUpdate, _: &ResourceClient<Supplier>) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: DeliveryAction, _: &ResourceClient<Supplier>) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (supplier_actor, suppliers) = ResourceActor::<Supplier>::new(10);
//!     let (delivery_actor, deliveries) = ResourceActor::<Delivery>::new(10);
//!
//!     tokio::spawn(supplier_actor.run(()));
//!     tokio::spawn(delivery_actor.run(suppliers.clone()));
//!
//!     let supplier = suppliers.create(SupplierCreate).await.unwrap();
//!     assert!(deliveries.create(DeliveryCreate { supplier }).await.is_ok());
//!     assert!(deliveries.create(DeliveryCreate { supplier: 99 }).await.is_err());
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Requests to one actor are processed **sequentially**, so state needs no locks
//! - Change events are sent after the mutation is stored and before the reply
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from a scripted queue and
//! [`mock::create_mock_client`] exposes the raw request stream. Both let an entity's hooks be
//! tested against fake dependencies without spawning the real actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod subscription;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use subscription::{Change, LiveView, Subscription};
