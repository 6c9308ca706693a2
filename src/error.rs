//! Top-level error for marketplace operations that span several actors or services.

use crate::config::ConfigError;
use crate::notification_actor::NotificationError;
use crate::order_actor::OrderError;
use crate::services::{AuthError, GeocodeError};
use crate::user_actor::UserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An actor task panicked or was aborted.
    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}
