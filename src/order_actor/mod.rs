//! # Order Actor
//!
//! Owns the order documents and their lifecycle.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](resource_store::ActorEntity) implementation for [`Order`]
//!   and the [`OrderContext`] it runs with
//! - [`actions`] - [`OrderAction`], the status transitions
//! - [`error`] - [`OrderError`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Dependencies
//!
//! The Order actor is the only one that talks to two others. Its context carries a
//! [`UserClient`](crate::clients::UserClient) to validate consumers and suppliers, a
//! [`NotificationClient`](crate::clients::NotificationClient) for the fan-out, and the
//! [`TransitionPolicy`](crate::model::TransitionPolicy):
//!
//! ```rust,ignore
//! tokio::spawn(order_actor.run(OrderContext {
//!     users: user_client.clone(),
//!     notifications: notification_client.clone(),
//!     policy: TransitionPolicy::Strict,
//! }));
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::OrderContext;
pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use resource_store::ResourceActor;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
