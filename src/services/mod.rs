//! Marketplace services built on top of the actor clients.
//!
//! - [`auth`]: registration, sign-in and password reset
//! - [`supplier_search`]: nearest-supplier ranking and filters
//! - [`geocoding`]: address lookup for the search origin
//! - [`order_filter`]: status and date narrowing for order histories
//! - [`seed`]: demo supplier accounts

pub mod auth;
pub mod geocoding;
pub mod order_filter;
pub mod seed;
pub mod supplier_search;

pub use auth::{is_valid_email, AuthError, AuthService, FieldError, RegistrationForm};
pub use geocoding::{GeocodeError, Geocoder, GoogleGeocoder, StaticGeocoder};
pub use order_filter::OrderFilter;
pub use supplier_search::{rank_suppliers, MissingLocation, SupplierFilters, SupplierSearch};
