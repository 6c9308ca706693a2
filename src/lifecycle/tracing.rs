//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber for the marketplace.
//!
//! `RUST_LOG` wins when it is set; otherwise the configured `AGUA_LOG_FILTER` is used.
//! Module paths are hidden (`with_target(false)`): the store already tags every line
//! with `entity_type`, so the target adds nothing but width.
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Store internals only
//! RUST_LOG=resource_store=debug cargo run
//!
//! # One JSON object per line
//! AGUA_LOG_FORMAT=json cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! Placing an order for a chosen supplier with `RUST_LOG=info`:
//!
//! ```text
//! INFO create_order: Sending create_order to actor
//! INFO Created entity_type="Notification" id="notification_1" size=1
//! INFO Created entity_type="Notification" id="notification_2" size=2
//! INFO Created entity_type="Order" id="order_1" size=1
//! ```
//!
//! The notifications are logged before the order: they are written from inside
//! `Order::on_create`, and the order is only stored once that hook succeeds.

use crate::config::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Returns `false` if one was already installed,
/// so tests and embedders can call it freely.
pub fn setup_tracing(config: &AppConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match config.log_format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.is_ok()
}
