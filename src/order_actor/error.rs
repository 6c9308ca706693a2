//! Error types for the Order actor.

use crate::model::{OrderStatus, UserId};
use crate::notification_actor::NotificationError;
use crate::user_actor::UserError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The consumer placing the order is missing or not a consumer.
    #[error("Invalid user: {0}")]
    InvalidUser(String),

    /// The chosen or accepting supplier is missing, not a supplier, or has no price.
    #[error("Invalid supplier: {0}")]
    InvalidSupplier(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// The move is not an edge of the lifecycle graph.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Acceptance without any supplier to assign.
    #[error("Accepting an order requires a supplier")]
    SupplierRequired,

    /// The order was placed with another supplier.
    #[error("Order is reserved for {expected}, not {actual}")]
    SupplierMismatch { expected: UserId, actual: UserId },

    /// The signed-in user's role or ownership does not allow the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunication(msg)
    }
}
