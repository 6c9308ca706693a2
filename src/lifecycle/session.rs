//! A signed-in user's view of the marketplace.
//!
//! A [`Session`] keeps two live views, the user's orders and their inbox, and routes
//! every order operation through the role rules below before it reaches the order actor.
//!
//! | Operation | Consumer | Supplier |
//! |---|---|---|
//! | place | yes | no |
//! | accept | no | pending orders, open or reserved for them |
//! | dispatch / deliver | no | orders assigned to them |
//! | cancel | own pending orders | pending or accepted, open or theirs |
//!
//! Views are updated by the store actors' change feeds. Call [`Session::refresh`] to apply
//! whatever has arrived, or await [`Session::changed`] to block until something does.
//! Changes queue up in memory until one of the two is called.

use crate::clients::{NotificationClient, OrderClient, UserClient};
use crate::error::MarketError;
use crate::model::{
    DeliveryLocation, GeoPoint, Notification, NotificationId, NotificationQuery, Order, OrderCreate,
    OrderId, OrderQuery, OrderStatus, Role, User, UserId,
};
use crate::notification_actor::NotificationError;
use crate::order_actor::OrderError;
use crate::services::OrderFilter;
use crate::user_actor::UserError;
use resource_store::{ActorClient, LiveView};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Display name used when a referenced account no longer resolves.
pub const UNKNOWN_NAME: &str = "Unknown";

/// One row of an order history, with the other party's name resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub order: Order,
    /// The supplier for consumers, the consumer for suppliers.
    pub counterpart: String,
}

#[derive(Debug)]
pub struct Session {
    user: User,
    users: UserClient,
    orders: OrderClient,
    notifications: NotificationClient,
    order_view: LiveView<Order>,
    inbox: LiveView<Notification>,
}

fn newest_first<'a, T: 'a, K: Ord>(
    items: impl Iterator<Item = &'a T>,
    key: impl Fn(&T) -> K,
) -> Vec<&'a T> {
    let mut items: Vec<&T> = items.collect();
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

impl Session {
    /// Opens the live views for `user`.
    #[instrument(skip_all, fields(user_id = %user.id, role = %user.role))]
    pub async fn start(
        user: User,
        users: UserClient,
        orders: OrderClient,
        notifications: NotificationClient,
    ) -> Result<Self, MarketError> {
        let order_query = match user.role {
            Role::Consumer => OrderQuery::ByConsumer(user.id),
            Role::Supplier => OrderQuery::VisibleToSupplier(user.id),
        };
        let order_view = LiveView::new(orders.subscribe(order_query).await?);
        let inbox = LiveView::new(
            notifications
                .subscribe(NotificationQuery::ForUser(user.id))
                .await?,
        );

        let mut session = Self {
            user,
            users,
            orders,
            notifications,
            order_view,
            inbox,
        };
        session.refresh();
        info!(
            orders = session.order_view.len(),
            unread = session.unread_count(),
            "Session started"
        );
        Ok(session)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Applies every queued change to both views. Returns how many changed something.
    pub fn refresh(&mut self) -> usize {
        self.order_view.sync() + self.inbox.sync()
    }

    /// Waits until either view receives a change and applies it.
    /// Returns `false` once the stores have shut down.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            alive = self.order_view.changed() => alive,
            alive = self.inbox.changed() => alive,
        }
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.order_view.get(&id)
    }

    /// Up to `limit` orders, newest first.
    pub fn recent_orders(&self, limit: usize) -> Vec<&Order> {
        let mut orders = newest_first(self.order_view.items(), |o: &Order| (o.created_at, o.id));
        orders.truncate(limit);
        orders
    }

    /// Every visible order accepted by `filter`, newest first.
    pub fn filtered_orders(&self, filter: &OrderFilter) -> Vec<&Order> {
        let orders = newest_first(self.order_view.items(), |o: &Order| (o.created_at, o.id));
        filter.apply(orders)
    }

    /// [`recent_orders`](Self::recent_orders) with the other party's name.
    ///
    /// Accounts that cannot be loaded show as [`UNKNOWN_NAME`]; this never fails.
    pub async fn order_summaries(&self, limit: usize) -> Vec<OrderSummary> {
        let mut names: HashMap<UserId, String> = HashMap::new();
        let mut summaries = Vec::new();
        for order in self.recent_orders(limit) {
            let counterpart = match self.user.role {
                Role::Consumer => order.supplier_id,
                Role::Supplier => Some(order.consumer_id),
            };
            let counterpart = match counterpart {
                Some(id) => match names.get(&id) {
                    Some(name) => name.clone(),
                    None => {
                        let name = match self.users.get(id).await {
                            Ok(Some(user)) => user.name,
                            Ok(None) | Err(_) => UNKNOWN_NAME.to_string(),
                        };
                        names.insert(id, name.clone());
                        name
                    }
                },
                None => UNKNOWN_NAME.to_string(),
            };
            summaries.push(OrderSummary {
                order: order.clone(),
                counterpart,
            });
        }
        summaries
    }

    /// Inbox, newest first.
    pub fn notifications(&self) -> Vec<&Notification> {
        newest_first(self.inbox.items(), |n: &Notification| (n.created_at, n.id))
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.items().filter(|n| !n.read).count()
    }

    fn require(&self, role: Role, operation: &str) -> Result<(), OrderError> {
        if self.user.role == role {
            Ok(())
        } else {
            Err(OrderError::Forbidden(format!(
                "{} cannot {operation} orders",
                self.user.role
            )))
        }
    }

    /// Loads the current state of `id` straight from the store.
    async fn load(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Places an order as this consumer. With no `supplier_id` every supplier is told.
    #[instrument(skip(self, location), fields(user_id = %self.user.id))]
    pub async fn place_order(
        &mut self,
        supplier_id: Option<UserId>,
        quantity: f64,
        location: DeliveryLocation,
    ) -> Result<OrderId, OrderError> {
        self.require(Role::Consumer, "place")?;
        let id = self
            .orders
            .create_order(OrderCreate {
                consumer_id: self.user.id,
                supplier_id,
                quantity,
                location,
                total: None,
            })
            .await?;
        self.refresh();
        Ok(id)
    }

    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn accept_order(&mut self, id: OrderId) -> Result<Order, OrderError> {
        self.require(Role::Supplier, "accept")?;
        let order = self.load(id).await?;
        if order.status != OrderStatus::Pending
            || order.supplier_id.is_some_and(|supplier| supplier != self.user.id)
        {
            return Err(OrderError::Forbidden(format!(
                "{id} is not open to {}",
                self.user.id
            )));
        }
        let order = self.orders.accept_order(id, self.user.id).await?;
        self.refresh();
        Ok(order)
    }

    async fn advance(&mut self, id: OrderId, to: OrderStatus) -> Result<Order, OrderError> {
        let order = self.load(id).await?;
        if order.supplier_id != Some(self.user.id) {
            return Err(OrderError::Forbidden(format!(
                "{id} is not assigned to {}",
                self.user.id
            )));
        }
        let order = self.orders.update_status(id, to).await?;
        self.refresh();
        Ok(order)
    }

    /// Marks an accepted order as on its way.
    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn dispatch(&mut self, id: OrderId) -> Result<Order, OrderError> {
        self.require(Role::Supplier, "dispatch")?;
        self.advance(id, OrderStatus::InTransit).await
    }

    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn deliver(&mut self, id: OrderId) -> Result<Order, OrderError> {
        self.require(Role::Supplier, "deliver")?;
        self.advance(id, OrderStatus::Delivered).await
    }

    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn cancel_order(&mut self, id: OrderId) -> Result<Order, OrderError> {
        let order = self.load(id).await?;
        let me = self.user.id;
        let allowed = match self.user.role {
            Role::Consumer => order.consumer_id == me && order.status == OrderStatus::Pending,
            Role::Supplier => {
                matches!(order.status, OrderStatus::Pending | OrderStatus::Accepted)
                    && order.supplier_id.map_or(true, |supplier| supplier == me)
            }
        };
        if !allowed {
            return Err(OrderError::Forbidden(format!(
                "{me} cannot cancel {id} while it is {}",
                order.status
            )));
        }
        let order = self.orders.cancel(id).await?;
        self.refresh();
        Ok(order)
    }

    /// Marks one of this user's notifications read. Returns `false` if it already was.
    ///
    /// Other users' notifications are reported as not found.
    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn mark_read(&mut self, id: NotificationId) -> Result<bool, NotificationError> {
        match self.notifications.get(id).await? {
            Some(notification) if notification.user_id == self.user.id => {}
            _ => return Err(NotificationError::NotFound(id.to_string())),
        }
        let changed = self.notifications.mark_read(id).await?;
        self.refresh();
        Ok(changed)
    }

    /// Returns how many notifications were newly marked.
    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn mark_all_read(&mut self) -> Result<usize, NotificationError> {
        self.refresh();
        let unread: Vec<NotificationId> = self
            .inbox
            .items()
            .filter(|n| !n.read)
            .map(|n| n.id)
            .collect();
        let mut marked = 0;
        for id in unread {
            if self.notifications.mark_read(id).await? {
                marked += 1;
            }
        }
        self.refresh();
        debug!(marked, "Inbox cleared");
        Ok(marked)
    }

    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn set_online(&mut self, online: bool) -> Result<bool, UserError> {
        let changed = self.users.set_online(self.user.id, online).await?;
        self.user.online = online;
        Ok(changed)
    }

    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn update_location(&mut self, point: GeoPoint) -> Result<bool, UserError> {
        let changed = self.users.update_location(self.user.id, point).await?;
        self.user.location = Some(point);
        Ok(changed)
    }

    /// Ends the session, releasing its clients and subscriptions.
    pub fn sign_out(self) {
        info!(user_id = %self.user.id, "Signed out");
    }
}
