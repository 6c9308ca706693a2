//! # User Actor
//!
//! Owns every account, consumer and supplier alike.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](resource_store::ActorEntity) implementation for [`User`]
//! - [`actions`] - [`UserAction`] for presence and location
//! - [`error`] - [`UserError`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use agua_expressa::model::{Role, UserCreate};
//! use agua_expressa::user_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = user_actor::new(32);
//!
//!     // No dependencies, so the context is ()
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .create_user(UserCreate {
//!             name: "Ana".to_string(),
//!             email: "ana@example.com".to_string(),
//!             password_hash: String::new(),
//!             role: Role::Consumer,
//!             phone: None,
//!             address: None,
//!             photo_url: None,
//!             location: None,
//!             price_per_liter: None,
//!             online: false,
//!         })
//!         .await?;
//!     assert!(client.find_by_email("ANA@example.com").await?.is_some());
//!     # let _ = id;
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::UserClient;
use crate::model::User;
use resource_store::ResourceActor;

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, UserClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, UserClient::new(generic_client))
}
