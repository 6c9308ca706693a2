use super::{OrderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u32);

impl From<u32> for NotificationId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification_{}", self.0)
    }
}

/// A message addressed to exactly one user.
///
/// Only the `read` flag ever changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    #[serde(rename = "message")]
    pub body: String,
    pub read: bool,
    pub related_order_id: Option<OrderId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    pub related_order_id: Option<OrderId>,
}

/// Notifications have no editable fields.
#[derive(Debug)]
pub enum NotificationUpdate {}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationQuery {
    ForUser(UserId),
    UnreadFor(UserId),
    ForOrder(OrderId),
}
