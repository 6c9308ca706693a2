//! # Notification Actor
//!
//! Stores the per-user inbox. Notifications are written by the order actor and read
//! through [`Session`](crate::lifecycle::Session) live views.
//!
//! The actor's context is a [`UserClient`](crate::clients::UserClient): `on_create` refuses
//! notifications for users that do not exist.

pub mod entity;
pub mod error;

pub use entity::NotificationAction;
pub use error::*;

use crate::clients::NotificationClient;
use crate::model::Notification;
use resource_store::ResourceActor;

/// Creates a new Notification actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Notification>, NotificationClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, NotificationClient::new(generic_client))
}
