//! Demo: one consumer orders water from the nearest supplier and follows it to the door.
//!
//! Set `AGUA_SEED_SUPPLIERS=true` to start from the twelve Lubango demo suppliers instead
//! of a single hand-registered one.

use agua_expressa::config::AppConfig;
use agua_expressa::error::MarketError;
use agua_expressa::lifecycle::{setup_tracing, Marketplace};
use agua_expressa::model::{DeliveryLocation, GeoPoint, Role};
use agua_expressa::services::seed::{LUBANGO_CENTRE, SEED_PASSWORD};
use agua_expressa::services::{RegistrationForm, StaticGeocoder, SupplierFilters};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

const DEMO_ADDRESS: &str = "Largo do Rossio, Lubango";

#[tokio::main]
async fn main() -> Result<(), MarketError> {
    let config = AppConfig::from_env()?;
    setup_tracing(&config);

    info!("Starting Água Expressa demo");

    let market = if config.google_maps_api_key.is_some() {
        Marketplace::new(&config)?
    } else {
        let geocoder = StaticGeocoder::new().with(DEMO_ADDRESS, LUBANGO_CENTRE);
        Marketplace::with_geocoder(&config, Arc::new(geocoder))?
    };

    // Suppliers
    if config.seed_suppliers {
        market.seed_suppliers().await?;
    } else {
        market
            .auth
            .register(RegistrationForm {
                name: "Fornecedor Mapunda".to_string(),
                email: "mapunda@aguaexpressa.ao".to_string(),
                password: SEED_PASSWORD.to_string(),
                confirm_password: SEED_PASSWORD.to_string(),
                role: Role::Supplier,
                phone: Some("+244 923 000 000".to_string()),
                address: Some("Bairro Mapunda, Lubango".to_string()),
                location: Some(GeoPoint::new(-14.9105, 13.4982)),
                price_per_liter: Some(12.0),
            })
            .await?;
    }

    // Consumer
    let password = "Agua2024!";
    market
        .auth
        .register(RegistrationForm {
            name: "Ana Lemos".to_string(),
            email: "ana@example.com".to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
            role: Role::Consumer,
            phone: None,
            address: Some(DEMO_ADDRESS.to_string()),
            location: None,
            price_per_liter: None,
        })
        .await?;
    let mut consumer = market.sign_in("ana@example.com", password).await?;

    // Search
    let (origin, nearby) = market
        .suppliers
        .near_address(DEMO_ADDRESS, &SupplierFilters::default())
        .instrument(tracing::info_span!("supplier_search"))
        .await?;
    for supplier in nearby.iter().take(3) {
        info!(
            supplier = %supplier.user.name,
            price = supplier.price_per_liter,
            distance_km = supplier.distance_km.unwrap_or(f64::NAN),
            "Nearby supplier"
        );
    }
    let Some(nearest) = nearby.first() else {
        warn!("No suppliers registered");
        consumer.sign_out();
        return market.shutdown().await;
    };

    // Order lifecycle
    let span = tracing::info_span!("order_lifecycle");
    async {
        let order_id = consumer
            .place_order(
                Some(nearest.id()),
                500.0,
                DeliveryLocation {
                    address: DEMO_ADDRESS.to_string(),
                    point: origin,
                },
            )
            .await?;
        info!(order_id = %order_id, quote = nearest.quote(500.0), "Order placed");

        let mut supplier = market.sign_in(&nearest.user.email, SEED_PASSWORD).await?;
        supplier.set_online(true).await?;
        supplier.accept_order(order_id).await?;
        supplier.dispatch(order_id).await?;
        let delivered = supplier.deliver(order_id).await?;
        info!(order_id = %order_id, status = %delivered.status, "Delivery finished");
        supplier.sign_out();
        Ok::<_, MarketError>(())
    }
    .instrument(span)
    .await?;

    consumer.refresh();
    for summary in consumer.order_summaries(5).await {
        info!(
            order_id = %summary.order.id,
            supplier = %summary.counterpart,
            status = %summary.order.status.label(),
            "History"
        );
    }
    for notification in consumer.notifications() {
        info!(title = %notification.title, body = %notification.body, "Inbox");
    }
    let marked = consumer.mark_all_read().await?;
    info!(marked, unread = consumer.unread_count(), "Inbox read");
    consumer.sign_out();

    market.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
