//! Error types for the Notification actor.

use crate::user_actor::UserError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),

    /// The addressee does not exist.
    #[error("Unknown recipient: {0}")]
    UnknownRecipient(String),

    #[error("Notification validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl From<String> for NotificationError {
    fn from(msg: String) -> Self {
        NotificationError::ActorCommunication(msg)
    }
}
