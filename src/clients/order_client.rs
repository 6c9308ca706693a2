//! # Order Client
//!
//! Provides a high‑level API for interacting with the `Order` actor.
//! Consumer/supplier validation and the notification fan-out happen inside the actor's
//! hooks, so every method here is a single request.
use crate::model::{Order, OrderCreate, OrderId, OrderQuery, OrderStatus, UserId};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use resource_store::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Debug, Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunication(e.to_string())),
        }
    }
}

impl OrderClient {
    #[instrument(skip(self))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("create_order called");
        info!("Sending create_order to actor");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Moves `id` to `status` and returns the stored order.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, OrderAction::Transition(status))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn accept_order(&self, id: OrderId, supplier_id: UserId) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, OrderAction::Accept { supplier_id })
            .await
            .map_err(Self::map_error)
    }

    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        self.update_status(id, OrderStatus::Canceled).await
    }

    pub async fn for_consumer(&self, consumer_id: UserId) -> Result<Vec<Order>, OrderError> {
        self.list(OrderQuery::ByConsumer(consumer_id)).await
    }

    pub async fn for_supplier(&self, supplier_id: UserId) -> Result<Vec<Order>, OrderError> {
        self.list(OrderQuery::BySupplier(supplier_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_store::mock::{create_mock_client, expect_action};

    #[tokio::test]
    async fn accept_order_sends_accept_action() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let orders = OrderClient::new(client);

        let task = tokio::spawn(async move { orders.accept_order(OrderId(4), UserId(7)).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, OrderId(4));
        match action {
            OrderAction::Accept { supplier_id } => assert_eq!(supplier_id, UserId(7)),
            other => panic!("Expected Accept action, got {other:?}"),
        }

        // Respond with a typed entity error
        responder
            .send(Err(FrameworkError::EntityError(Box::new(
                OrderError::SupplierMismatch {
                    expected: UserId(5),
                    actual: UserId(7),
                },
            ))))
            .unwrap();

        assert_eq!(
            task.await.unwrap().unwrap_err(),
            OrderError::SupplierMismatch {
                expected: UserId(5),
                actual: UserId(7)
            }
        );
    }

    #[tokio::test]
    async fn closed_actor_is_a_communication_error() {
        let (client, receiver) = create_mock_client::<Order>(10);
        drop(receiver);
        let orders = OrderClient::new(client);

        let err = orders.cancel(OrderId(1)).await.unwrap_err();
        assert!(matches!(err, OrderError::ActorCommunication(_)));
    }
}
