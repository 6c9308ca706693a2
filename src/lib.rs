//! # Água Expressa
//!
//! > **A water-delivery marketplace on resource-oriented actors.**
//!
//! Consumers order drinking water by the liter; nearby suppliers accept, dispatch and
//! deliver it. Every collection (users, orders, notifications) lives in its own
//! [`ResourceActor`](resource_store::ResourceActor) from the `resource-store` crate, and
//! signed-in users watch their orders and inbox through live change feeds.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! Plain, serializable records: [`User`](model::User), [`Order`](model::Order),
//! [`Notification`](model::Notification), and the [`GeoPoint`](model::GeoPoint) /
//! haversine helpers.
//!
//! ### 2. The Actors ([`user_actor`], [`order_actor`], [`notification_actor`])
//! `ActorEntity` implementations. The order actor owns the lifecycle state machine
//! (`pending → accepted → in_transit → delivered`, with `canceled` from the first two)
//! and fans notifications out from inside its hooks.
//!
//! ### 3. The Interface ([`clients`])
//! Typed wrappers over `ResourceClient` that hand back each actor's own error type.
//!
//! ### 4. The Services ([`services`])
//! Registration and sign-in, nearest-supplier search, geocoding, order filtering and
//! demo seeding.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`Marketplace`](lifecycle::Marketplace) spins the actors up in dependency order and
//! shuts them down again; [`Session`](lifecycle::Session) is one user's view of it.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### Late-bound context
//! The notification actor needs a `UserClient`, the order actor needs both a
//! `UserClient` and a `NotificationClient`. Each receives them at `run()`, after every
//! client exists.
//!
//! ### Transition policy
//! [`TransitionPolicy::Strict`](model::TransitionPolicy) (default) only allows the moves
//! on the lifecycle graph. `Lenient` accepts any status, for data repair.
//!
//! ### Configuration
//! [`AppConfig`](config::AppConfig) reads `AGUA_*` environment variables, with `.env`
//! support.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod notification_actor;
pub mod order_actor;
pub mod services;
pub mod user_actor;
