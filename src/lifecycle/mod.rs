//! Runtime orchestration.
//!
//! - [`Marketplace`] starts the store actors, wires their dependencies and shuts them down
//! - [`Session`] is one signed-in user's live view of their orders and inbox
//! - [`setup_tracing`] installs the log subscriber

pub mod marketplace;
pub mod session;
pub mod tracing;

pub use marketplace::*;
pub use session::*;
pub use tracing::*;
