//! ActorEntity implementation for [`Order`].
//!
//! Orders are the only entity whose hooks reach into other actors:
//!
//! - `on_create` checks the consumer and the chosen supplier against the user store and
//!   fans the "new order" notifications out.
//! - `handle_action` applies a status transition and notifies the consumer.
//!
//! If a notification cannot be written the hook fails and the actor rolls the order back.

use super::actions::OrderAction;
use super::error::OrderError;
use crate::clients::{NotificationClient, UserClient};
use crate::model::{
    NotificationCreate, Order, OrderCreate, OrderId, OrderQuery, OrderStatus, OrderUpdate,
    Supplier, TransitionPolicy, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use resource_store::{ActorClient, ActorEntity};
use tracing::debug;

/// Dependencies injected into the Order actor at `run()`.
#[derive(Debug, Clone)]
pub struct OrderContext {
    pub users: UserClient,
    pub notifications: NotificationClient,
    pub policy: TransitionPolicy,
}

impl Order {
    /// Moves the order to `to`, assigning `supplier` on acceptance and stamping the
    /// timestamp that belongs to `to`.
    ///
    /// Leaves the order untouched on error.
    pub fn apply_transition(
        &mut self,
        to: OrderStatus,
        supplier: Option<UserId>,
        policy: TransitionPolicy,
        at: DateTime<Utc>,
    ) -> Result<(), OrderError> {
        if policy == TransitionPolicy::Strict {
            if !self.status.can_transition_to(to) {
                return Err(OrderError::InvalidTransition {
                    from: self.status,
                    to,
                });
            }
            if to == OrderStatus::Accepted {
                match (self.supplier_id, supplier) {
                    (None, None) => return Err(OrderError::SupplierRequired),
                    (Some(expected), Some(actual)) if expected != actual => {
                        return Err(OrderError::SupplierMismatch { expected, actual })
                    }
                    _ => {}
                }
            }
        }

        if to == OrderStatus::Accepted {
            if let Some(supplier) = supplier {
                self.supplier_id = Some(supplier);
            }
        }
        self.status = to;
        match to {
            OrderStatus::Pending => {}
            OrderStatus::Accepted => self.accepted_at = Some(at),
            OrderStatus::InTransit => self.in_transit_at = Some(at),
            OrderStatus::Delivered => self.delivered_at = Some(at),
            OrderStatus::Canceled => self.canceled_at = Some(at),
        }
        Ok(())
    }

    fn notification(&self, user_id: UserId, title: &str, body: String) -> NotificationCreate {
        NotificationCreate {
            user_id,
            title: title.to_string(),
            body,
            related_order_id: Some(self.id),
        }
    }
}

/// Loads `id` and checks that it is a supplier with a price.
async fn fetch_supplier(users: &UserClient, id: UserId) -> Result<Supplier, OrderError> {
    let user = users
        .get(id)
        .await?
        .ok_or_else(|| OrderError::InvalidSupplier(format!("{id} does not exist")))?;
    Supplier::try_from(user)
        .map_err(|user| OrderError::InvalidSupplier(format!("{} is not a priced supplier", user.id)))
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Query = OrderQuery;
    type Context = OrderContext;
    type Error = OrderError;

    /// Validates the payload. New orders always start `pending`.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if !params.quantity.is_finite() || params.quantity <= 0.0 {
            return Err(OrderError::Validation(format!(
                "quantity must be a positive number of liters, got {}",
                params.quantity
            )));
        }
        let mut location = params.location;
        location.address = location.address.trim().to_string();
        if location.address.is_empty() {
            return Err(OrderError::Validation(
                "delivery address must not be empty".to_string(),
            ));
        }
        if !location.point.is_valid() {
            return Err(OrderError::Validation(format!(
                "invalid delivery coordinates {:?}",
                location.point
            )));
        }
        if let Some(total) = params.total {
            if !total.is_finite() || total < 0.0 {
                return Err(OrderError::Validation(format!("invalid total {total}")));
            }
        }

        Ok(Self {
            id,
            consumer_id: params.consumer_id,
            supplier_id: params.supplier_id,
            quantity: params.quantity,
            location,
            total: params.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            accepted_at: None,
            in_transit_at: None,
            delivered_at: None,
            canceled_at: None,
        })
    }

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        match query {
            OrderQuery::All => true,
            OrderQuery::ByConsumer(consumer) => self.consumer_id == *consumer,
            OrderQuery::BySupplier(supplier) => self.supplier_id == Some(*supplier),
            OrderQuery::ByStatus(status) => self.status == *status,
            OrderQuery::VisibleToSupplier(supplier) => {
                self.supplier_id == Some(*supplier)
                    || (self.status == OrderStatus::Pending && self.supplier_id.is_none())
            }
        }
    }

    /// Validates the parties and sends the creation notifications:
    /// one to the chosen supplier, or one to every supplier when none was chosen,
    /// then a confirmation to the consumer.
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), Self::Error> {
        let consumer = ctx
            .users
            .get(self.consumer_id)
            .await?
            .ok_or_else(|| OrderError::InvalidUser(format!("{} does not exist", self.consumer_id)))?;
        if !consumer.is_consumer() {
            return Err(OrderError::InvalidUser(format!(
                "{} is not a consumer",
                consumer.id
            )));
        }

        let recipients = match self.supplier_id {
            Some(id) => {
                let supplier = fetch_supplier(&ctx.users, id).await?;
                if self.total.is_none() {
                    self.total = Some(supplier.quote(self.quantity));
                }
                vec![id]
            }
            None => ctx
                .users
                .suppliers()
                .await?
                .into_iter()
                .map(|supplier| supplier.id)
                .collect(),
        };
        debug!(order_id = %self.id, recipients = recipients.len(), "Notifying suppliers");

        for supplier_id in recipients {
            let body = format!(
                "{} L requested for {}",
                self.quantity, self.location.address
            );
            ctx.notifications
                .notify(self.notification(supplier_id, "New order", body))
                .await?;
        }

        let body = format!(
            "Your order of {} L was placed and is waiting for a supplier.",
            self.quantity
        );
        ctx.notifications
            .notify(self.notification(self.consumer_id, "Order placed", body))
            .await?;
        Ok(())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &OrderContext) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<Order, Self::Error> {
        let (to, supplier) = match action {
            OrderAction::Transition(to) => (to, None),
            OrderAction::Accept { supplier_id } => {
                let supplier = fetch_supplier(&ctx.users, supplier_id).await?;
                (OrderStatus::Accepted, Some(supplier))
            }
        };

        self.apply_transition(
            to,
            supplier.as_ref().map(Supplier::id),
            ctx.policy,
            Utc::now(),
        )?;
        if let (None, Some(supplier)) = (self.total, &supplier) {
            self.total = Some(supplier.quote(self.quantity));
        }

        let body = format!(
            "Your order of {} L is now {}.",
            self.quantity,
            to.label().to_lowercase()
        );
        ctx.notifications
            .notify(self.notification(self.consumer_id, &format!("Order {to}"), body))
            .await?;
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeliveryLocation, GeoPoint};

    fn pending(supplier_id: Option<UserId>) -> Order {
        Order::from_create_params(
            OrderId(1),
            OrderCreate {
                consumer_id: UserId(1),
                supplier_id,
                quantity: 1000.0,
                location: DeliveryLocation {
                    address: " Rua A, Luanda ".into(),
                    point: GeoPoint::new(-8.8383, 13.2344),
                },
                total: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn new_orders_start_pending_with_a_trimmed_address() {
        let order = pending(None);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.location.address, "Rua A, Luanda");
        assert!(order.accepted_at.is_none());
    }

    #[test]
    fn invalid_payloads_are_rejected() {
        let mut params = OrderCreate {
            consumer_id: UserId(1),
            supplier_id: None,
            quantity: 0.0,
            location: DeliveryLocation {
                address: "Rua A".into(),
                point: GeoPoint::new(-8.8, 13.2),
            },
            total: None,
        };
        assert!(matches!(
            Order::from_create_params(OrderId(1), params.clone()),
            Err(OrderError::Validation(_))
        ));

        params.quantity = f64::NAN;
        assert!(Order::from_create_params(OrderId(1), params.clone()).is_err());

        params.quantity = 20.0;
        params.location.address = "   ".into();
        assert!(Order::from_create_params(OrderId(1), params).is_err());
    }

    #[test]
    fn strict_open_order_leaves_pending_only_by_acceptance_or_cancel() {
        let now = Utc::now();
        let strict = TransitionPolicy::Strict;
        for to in [OrderStatus::InTransit, OrderStatus::Delivered] {
            let mut order = pending(None);
            assert!(order.apply_transition(to, None, strict, now).is_err());
            assert_eq!(order.status, OrderStatus::Pending);
        }
        let mut order = pending(None);
        assert_eq!(
            order.apply_transition(OrderStatus::Accepted, None, strict, now),
            Err(OrderError::SupplierRequired)
        );

        order
            .apply_transition(OrderStatus::Canceled, None, strict, now)
            .unwrap();
        assert_eq!(order.status, OrderStatus::Canceled);
        assert_eq!(order.supplier_id, None);
    }

    #[test]
    fn strict_happy_path_stamps_every_status() {
        let mut order = pending(None);
        let now = Utc::now();
        let strict = TransitionPolicy::Strict;

        order
            .apply_transition(OrderStatus::Accepted, Some(UserId(9)), strict, now)
            .unwrap();
        assert_eq!(order.supplier_id, Some(UserId(9)));
        order
            .apply_transition(OrderStatus::InTransit, None, strict, now)
            .unwrap();
        order
            .apply_transition(OrderStatus::Delivered, None, strict, now)
            .unwrap();

        for status in [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::InTransit,
            OrderStatus::Delivered,
        ] {
            assert!(order.stamp(status).is_some(), "{status} not stamped");
        }
        assert!(order.canceled_at.is_none());
    }

    #[test]
    fn cancel_from_pending_only_sets_canceled_at() {
        let mut order = pending(None);
        order
            .apply_transition(
                OrderStatus::Canceled,
                None,
                TransitionPolicy::Strict,
                Utc::now(),
            )
            .unwrap();
        assert_eq!(order.status, OrderStatus::Canceled);
        assert!(order.canceled_at.is_some());
        assert!(order.accepted_at.is_none());
        assert!(order.delivered_at.is_none());
    }

    #[test]
    fn strict_rejects_moves_off_the_graph() {
        let mut order = pending(None);
        let err = order
            .apply_transition(
                OrderStatus::Delivered,
                None,
                TransitionPolicy::Strict,
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered
            }
        );
        assert_eq!(order, pending(None).with_created_at(order.created_at));
    }

    #[test]
    fn strict_acceptance_needs_the_right_supplier() {
        let now = Utc::now();
        let mut open = pending(None);
        assert_eq!(
            open.apply_transition(OrderStatus::Accepted, None, TransitionPolicy::Strict, now),
            Err(OrderError::SupplierRequired)
        );

        let mut reserved = pending(Some(UserId(5)));
        assert_eq!(
            reserved.apply_transition(
                OrderStatus::Accepted,
                Some(UserId(6)),
                TransitionPolicy::Strict,
                now
            ),
            Err(OrderError::SupplierMismatch {
                expected: UserId(5),
                actual: UserId(6)
            })
        );
        // the reserved supplier can accept without naming itself again
        reserved
            .apply_transition(OrderStatus::Accepted, None, TransitionPolicy::Strict, now)
            .unwrap();
        assert_eq!(reserved.supplier_id, Some(UserId(5)));
    }

    #[test]
    fn lenient_allows_delivered_back_to_pending() {
        let now = Utc::now();
        let mut order = pending(None);
        order
            .apply_transition(OrderStatus::Delivered, None, TransitionPolicy::Lenient, now)
            .unwrap();
        assert!(order.delivered_at.is_some());
        order
            .apply_transition(OrderStatus::Pending, None, TransitionPolicy::Lenient, now)
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let mut delivered = pending(Some(UserId(5)));
        delivered.status = OrderStatus::Delivered;
        assert!(delivered
            .apply_transition(OrderStatus::Pending, None, TransitionPolicy::Strict, now)
            .is_err());
    }

    #[test]
    fn supplier_visibility() {
        let open = pending(None);
        let reserved = pending(Some(UserId(5)));
        let me = OrderQuery::VisibleToSupplier(UserId(5));
        let other = OrderQuery::VisibleToSupplier(UserId(6));

        assert!(open.matches(&me) && open.matches(&other));
        assert!(reserved.matches(&me));
        assert!(!reserved.matches(&other));
    }

    impl Order {
        fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
            self.created_at = at;
            self
        }
    }
}
