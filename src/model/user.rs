use super::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u32);

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

/// Which side of the marketplace an account is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Consumer,
    Supplier,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Consumer => f.write_str("consumer"),
            Role::Supplier => f.write_str("supplier"),
        }
    }
}

/// A registered account, consumer or supplier.
///
/// # Resource Store
/// This struct implements the [`ActorEntity`](resource_store::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](resource_store::ResourceActor).
///
/// See [`impl ActorEntity for User`](#impl-ActorEntity-for-User) for details on:
/// - Creation parameters ([`UserCreate`])
/// - Update parameters ([`UserUpdate`])
/// - Custom actions ([`UserAction`](crate::user_actor::UserAction))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Stored trimmed and lowercased.
    pub email: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "userType")]
    pub role: Role,
    pub location: Option<GeoPoint>,
    pub online: bool,
    pub price_per_liter: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub password_hash: String,
}

impl User {
    pub fn is_supplier(&self) -> bool {
        self.role == Role::Supplier
    }

    pub fn is_consumer(&self) -> bool {
        self.role == Role::Consumer
    }
}

/// Payload for creating a new user.
#[derive(Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub location: Option<GeoPoint>,
    pub price_per_liter: Option<f64>,
    pub online: bool,
}

// Hand-written so the hash never reaches the logs.
impl std::fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCreate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("location", &self.location)
            .field("price_per_liter", &self.price_per_liter)
            .field("online", &self.online)
            .finish_non_exhaustive()
    }
}

/// Profile and settings edits. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub price_per_liter: Option<f64>,
}

/// Equality queries over the user collection.
#[derive(Debug, Clone, PartialEq)]
pub enum UserQuery {
    All,
    ByRole(Role),
    /// Case-insensitive.
    ByEmail(String),
}
