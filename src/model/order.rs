//! Orders and their lifecycle states.
//!
//! ```text
//! pending ──> accepted ──> in_transit ──> delivered
//!    │            │
//!    └────────────┴──> canceled
//! ```
//!
//! `delivered` and `canceled` are terminal. Whether the graph is enforced depends on the
//! [`TransitionPolicy`] the order actor runs with.

use super::{GeoPoint, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    InTransit,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Canceled)
                | (Accepted, InTransit)
                | (Accepted, Canceled)
                | (InTransit, Delivered)
        )
    }

    /// Wire name, as stored and as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Badge label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Aguardando",
            OrderStatus::Accepted => "Aceito",
            OrderStatus::InTransit => "A caminho",
            OrderStatus::Delivered => "Entregue",
            OrderStatus::Canceled => "Cancelado",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::InTransit => f.write_str("in transit"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status '{s}'"))
    }
}

/// How strictly the order actor enforces the lifecycle graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Only graph edges; acceptance needs a supplier; terminal orders are frozen.
    #[default]
    Strict,
    /// Any status may follow any status. Timestamps are still stamped.
    Lenient,
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TransitionPolicy::Strict),
            "lenient" => Ok(TransitionPolicy::Lenient),
            other => Err(format!("expected 'strict' or 'lenient', got '{other}'")),
        }
    }
}

/// Where the water goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLocation {
    pub address: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

/// A delivery order.
///
/// # Resource Store
/// This struct implements the [`ActorEntity`](resource_store::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](resource_store::ResourceActor).
///
/// See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Custom actions ([`OrderAction`](crate::order_actor::OrderAction))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub consumer_id: UserId,
    /// Set on acceptance. Under the strict policy an order without a supplier is either
    /// still pending or was canceled while pending.
    pub supplier_id: Option<UserId>,
    /// Liters.
    pub quantity: f64,
    pub location: DeliveryLocation,
    pub total: Option<f64>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub in_transit_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl Order {
    /// When the order entered `status`, if it ever did.
    pub fn stamp(&self, status: OrderStatus) -> Option<DateTime<Utc>> {
        match status {
            OrderStatus::Pending => Some(self.created_at),
            OrderStatus::Accepted => self.accepted_at,
            OrderStatus::InTransit => self.in_transit_at,
            OrderStatus::Delivered => self.delivered_at,
            OrderStatus::Canceled => self.canceled_at,
        }
    }
}

/// Payload for placing a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub consumer_id: UserId,
    /// A supplier picked from the search results, if any.
    pub supplier_id: Option<UserId>,
    pub quantity: f64,
    pub location: DeliveryLocation,
    /// Derived from the supplier's price when absent.
    pub total: Option<f64>,
}

/// Orders are only changed through [`OrderAction`](crate::order_actor::OrderAction)s.
#[derive(Debug)]
pub enum OrderUpdate {}

/// Equality queries over the order collection.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderQuery {
    All,
    ByConsumer(UserId),
    BySupplier(UserId),
    ByStatus(OrderStatus),
    /// Orders assigned to this supplier plus the unassigned pending ones.
    VisibleToSupplier(UserId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_edges() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Canceled));
        assert!(Accepted.can_transition_to(InTransit));
        assert!(Accepted.can_transition_to(Canceled));
        assert!(InTransit.can_transition_to(Delivered));

        assert!(!InTransit.can_transition_to(Canceled));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
        for next in OrderStatus::ALL {
            assert!(!Canceled.can_transition_to(next));
            assert!(!Delivered.can_transition_to(next));
        }
    }

    #[test]
    fn status_wire_names_round_trip_through_serde() {
        let json = serde_json::to_string(&OrderStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
        assert_eq!("in_transit".parse::<OrderStatus>(), Ok(OrderStatus::InTransit));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn display_and_label() {
        assert_eq!(OrderStatus::Canceled.to_string(), "canceled");
        assert_eq!(OrderStatus::InTransit.to_string(), "in transit");
        assert_eq!(OrderStatus::Pending.label(), "Aguardando");
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Lenient".parse(), Ok(TransitionPolicy::Lenient));
        assert_eq!(" strict ".parse(), Ok(TransitionPolicy::Strict));
        assert!("loose".parse::<TransitionPolicy>().is_err());
    }

    #[test]
    fn order_serializes_as_camel_case_document() {
        let order = Order {
            id: OrderId(7),
            consumer_id: UserId(1),
            supplier_id: None,
            quantity: 500.0,
            location: DeliveryLocation {
                address: "Rua A, Luanda".into(),
                point: GeoPoint::new(-8.8383, 13.2344),
            },
            total: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            accepted_at: None,
            in_transit_at: None,
            delivered_at: None,
            canceled_at: None,
        };
        let doc = serde_json::to_value(&order).unwrap();
        assert_eq!(doc["consumerId"], 1);
        assert_eq!(doc["status"], "pending");
        assert_eq!(doc["location"]["lat"], -8.8383);
        assert!(doc["acceptedAt"].is_null());
    }
}
