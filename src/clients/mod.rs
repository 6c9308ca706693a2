//! Domain clients wrapping [`ResourceClient`](resource_store::ResourceClient).
//!
//! Each client implements [`ActorClient`](resource_store::ActorClient) for `get`, `delete`,
//! `list` and `subscribe`, and recovers its actor's typed error from the store's boxed one.

pub mod notification_client;
pub mod order_client;
pub mod user_client;

pub use notification_client::*;
pub use order_client::*;
pub use user_client::*;
