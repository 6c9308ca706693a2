//! Custom actions for the User actor.
//!
//! Presence and position change far more often than profile data, so they bypass
//! [`UserUpdate`](crate::model::UserUpdate) and have their own actions.

use crate::model::GeoPoint;

/// Custom actions for User entities.
///
/// Each returns `true` if the user actually changed.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Marks a supplier as available (or not) for new orders.
    SetOnline(bool),
    /// Replaces the user's last known position.
    UpdateLocation(GeoPoint),
}
