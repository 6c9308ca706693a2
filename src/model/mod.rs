//! Plain data types for the marketplace documents.
//!
//! The store-facing behavior of [`User`], [`Order`] and [`Notification`] lives next to their
//! actors (`user_actor`, `order_actor`, `notification_actor`); this module only holds the
//! documents, their ids, DTOs and query enums.

pub mod geo;
pub mod notification;
pub mod order;
pub mod supplier;
pub mod user;

pub use geo::*;
pub use notification::*;
pub use order::*;
pub use supplier::*;
pub use user::*;
