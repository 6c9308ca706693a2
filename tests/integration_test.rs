mod common;

use agua_expressa::config::AppConfig;
use agua_expressa::model::{
    NotificationQuery, OrderCreate, OrderStatus, Role, TransitionPolicy, UserCreate, UserId,
};
use agua_expressa::order_actor::OrderError;
use agua_expressa::services::{AuthError, SupplierFilters};
use common::*;
use resource_store::{ActorClient, Change};

/// Full end-to-end test with all real actors: search, order, deliver.
#[tokio::test]
async fn test_full_delivery_flow() {
    let market = start();
    let suppliers = register_sample_suppliers(&market).await;
    let consumer_id = register_consumer(&market, "Ana", "ana@example.com").await;

    // Nearest first; both sample suppliers are within a couple of hundred meters
    let (origin, nearby) = market
        .suppliers
        .near_address(HOME_ADDRESS, &SupplierFilters::default())
        .await
        .expect("Search failed");
    assert_eq!(origin, HOME);
    let ids: Vec<UserId> = nearby.iter().map(|s| s.id()).collect();
    assert_eq!(ids, suppliers);
    let second = nearby[1].distance_km.expect("Supplier B has a location");
    assert!(second > 0.0 && second < 2.0, "distance was {second}");

    // Place an order with the nearest supplier
    let order_id = market
        .orders
        .create_order(OrderCreate {
            consumer_id,
            supplier_id: Some(suppliers[0]),
            quantity: 500.0,
            location: home(),
            total: None,
        })
        .await
        .expect("Failed to create order");

    let order = market.orders.get(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, Some(50_000.0));

    // Only the chosen supplier hears about it
    let inbox_a = market.notifications.for_user(suppliers[0]).await.unwrap();
    let inbox_b = market.notifications.for_user(suppliers[1]).await.unwrap();
    assert_eq!(inbox_a.len(), 1);
    assert_eq!(inbox_a[0].title, "New order");
    assert_eq!(inbox_a[0].related_order_id, Some(order_id));
    assert!(inbox_b.is_empty());

    // Walk the lifecycle
    market.orders.accept_order(order_id, suppliers[0]).await.unwrap();
    market
        .orders
        .update_status(order_id, OrderStatus::InTransit)
        .await
        .unwrap();
    let delivered = market
        .orders
        .update_status(order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.supplier_id, Some(suppliers[0]));
    assert!(delivered.accepted_at.is_some());
    assert!(delivered.in_transit_at.is_some());
    assert!(delivered.delivered_at.is_some());
    assert!(delivered.canceled_at.is_none());

    // Placed + one per transition, newest first
    let titles: Vec<String> = market
        .notifications
        .for_user(consumer_id)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(
        titles,
        vec![
            "Order delivered",
            "Order in transit",
            "Order accepted",
            "Order placed"
        ]
    );

    market.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_open_order_notifies_every_supplier() {
    let market = start();
    let suppliers = register_sample_suppliers(&market).await;
    let consumer_id = register_consumer(&market, "Ana", "ana@example.com").await;

    let order_id = market
        .orders
        .create_order(OrderCreate {
            consumer_id,
            supplier_id: None,
            quantity: 200.0,
            location: home(),
            total: None,
        })
        .await
        .unwrap();

    for supplier in &suppliers {
        let inbox = market.notifications.for_user(*supplier).await.unwrap();
        assert_eq!(inbox.len(), 1, "{supplier} should be notified once");
        assert_eq!(inbox[0].related_order_id, Some(order_id));
    }
    assert_eq!(market.notifications.unread_count(consumer_id).await.unwrap(), 1);

    // No supplier yet, so no price either
    let order = market.orders.get(order_id).await.unwrap().unwrap();
    assert_eq!(order.total, None);

    // Whoever accepts sets the price
    let accepted = market.orders.accept_order(order_id, suppliers[1]).await.unwrap();
    assert_eq!(accepted.total, Some(200.0 * 120.0));

    market.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancel_pending_order() {
    let market = start();
    register_sample_suppliers(&market).await;
    let consumer_id = register_consumer(&market, "Ana", "ana@example.com").await;

    let order_id = market
        .orders
        .create_order(OrderCreate {
            consumer_id,
            supplier_id: None,
            quantity: 20.0,
            location: home(),
            total: Some(1_500.0),
        })
        .await
        .unwrap();

    let canceled = market.orders.cancel(order_id).await.unwrap();
    assert_eq!(canceled.status, OrderStatus::Canceled);
    assert!(canceled.canceled_at.is_some());
    assert!(canceled.accepted_at.is_none());
    assert!(canceled.delivered_at.is_none());
    assert_eq!(canceled.total, Some(1_500.0));
    // Nobody ever accepted it
    assert_eq!(canceled.supplier_id, None);

    let inbox = market.notifications.for_user(consumer_id).await.unwrap();
    let canceled_notes: Vec<_> = inbox
        .iter()
        .filter(|n| n.title == "Order canceled")
        .collect();
    assert_eq!(canceled_notes.len(), 1);
    assert_eq!(canceled_notes[0].related_order_id, Some(order_id));

    // Terminal
    let err = market
        .orders
        .update_status(order_id, OrderStatus::Accepted)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Canceled,
            to: OrderStatus::Accepted
        }
    );

    market.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_transition_policy() {
    for (policy, allowed) in [
        (TransitionPolicy::Strict, false),
        (TransitionPolicy::Lenient, true),
    ] {
        let market = start_with(&AppConfig {
            transition_policy: policy,
            ..test_config()
        });
        let suppliers = register_sample_suppliers(&market).await;
        let consumer_id = register_consumer(&market, "Ana", "ana@example.com").await;
        let order_id = market
            .orders
            .create_order(OrderCreate {
                consumer_id,
                supplier_id: Some(suppliers[0]),
                quantity: 100.0,
                location: home(),
                total: None,
            })
            .await
            .unwrap();
        market.orders.accept_order(order_id, suppliers[0]).await.unwrap();
        market
            .orders
            .update_status(order_id, OrderStatus::InTransit)
            .await
            .unwrap();
        market
            .orders
            .update_status(order_id, OrderStatus::Delivered)
            .await
            .unwrap();

        let before = market.notifications.for_user(consumer_id).await.unwrap().len();
        let result = market
            .orders
            .update_status(order_id, OrderStatus::Pending)
            .await;
        let after = market.notifications.for_user(consumer_id).await.unwrap().len();

        assert_eq!(result.is_ok(), allowed, "{policy:?}");
        let stored = market.orders.get(order_id).await.unwrap().unwrap();
        if allowed {
            assert_eq!(stored.status, OrderStatus::Pending);
            assert_eq!(after, before + 1);
        } else {
            assert_eq!(stored.status, OrderStatus::Delivered);
            assert_eq!(after, before);
        }

        market.shutdown().await.unwrap();
    }
}

#[tokio::test]
async fn test_invalid_parties_are_rejected() {
    let market = start();
    let suppliers = register_sample_suppliers(&market).await;
    let consumer_id = register_consumer(&market, "Ana", "ana@example.com").await;

    let order = |consumer_id, supplier_id| OrderCreate {
        consumer_id,
        supplier_id,
        quantity: 100.0,
        location: home(),
        total: None,
    };

    let err = market
        .orders
        .create_order(order(UserId(404), None))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidUser(_)), "{err:?}");

    // Suppliers cannot order
    let err = market
        .orders
        .create_order(order(suppliers[0], None))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidUser(_)), "{err:?}");

    // A consumer is not a supplier
    let err = market
        .orders
        .create_order(order(consumer_id, Some(consumer_id)))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidSupplier(_)), "{err:?}");

    assert!(market.orders.for_consumer(consumer_id).await.unwrap().is_empty());

    market.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let market = start();
    register_sample_suppliers(&market).await;
    let consumer_id = register_consumer(&market, "Ana", "ana@example.com").await;
    market
        .orders
        .create_order(OrderCreate {
            consumer_id,
            supplier_id: None,
            quantity: 100.0,
            location: home(),
            total: None,
        })
        .await
        .unwrap();

    let mut feed = market
        .notifications
        .subscribe(NotificationQuery::ForUser(consumer_id))
        .await
        .unwrap();
    let note = match feed.try_next() {
        Some(Change::Added(note)) => note,
        other => panic!("Expected snapshot, got {other:?}"),
    };
    assert!(feed.try_next().is_none());

    assert!(market.notifications.mark_read(note.id).await.unwrap());
    match feed.try_next() {
        Some(Change::Modified(updated)) => assert!(updated.read),
        other => panic!("Expected Modified, got {other:?}"),
    }

    // Second time: still read, nothing published
    assert!(!market.notifications.mark_read(note.id).await.unwrap());
    assert!(feed.try_next().is_none());
    let stored = market.notifications.get(note.id).await.unwrap().unwrap();
    assert!(stored.read);
    assert_eq!(market.notifications.unread_count(consumer_id).await.unwrap(), 0);

    drop(feed);
    market.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_registration_rules() {
    let market = start();
    register_consumer(&market, "Ana", "ana@example.com").await;

    // Duplicate email, whatever the case
    let err = market
        .auth
        .register(form("Ana Two", "ANA@Example.com", Role::Consumer))
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::EmailTaken("ana@example.com".to_string()));

    // Suppliers need a price
    let err = market
        .auth
        .register(form("Água Boa", "boa@example.com", Role::Supplier))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidForm(ref fields) if fields[0].field == "price_per_liter"));

    // Sign-in is case-insensitive on the email only
    let user = market.auth.sign_in("Ana@Example.com", PASSWORD).await.unwrap();
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(
        market.auth.sign_in("ana@example.com", "segura123").await.unwrap_err(),
        AuthError::InvalidCredentials
    );
    assert_eq!(
        market.auth.sign_in("nobody@example.com", PASSWORD).await.unwrap_err(),
        AuthError::InvalidCredentials
    );

    assert!(market.auth.request_password_reset("ana@example.com").await.is_ok());
    assert!(market.auth.request_password_reset("nobody@example.com").await.is_ok());
    assert!(market.auth.request_password_reset("not-an-email").await.is_err());

    market.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_non_ascii_email_is_one_account() {
    let market = start();
    let id = market
        .auth
        .register(form("Éva", "Éva@Mail.com", Role::Consumer))
        .await
        .unwrap();

    let user = market.auth.sign_in("Éva@Mail.com", PASSWORD).await.unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.email, "éva@mail.com");
    assert_eq!(
        market.auth.sign_in("éVA@MAIL.COM", PASSWORD).await.unwrap().id,
        id
    );

    let err = market
        .auth
        .register(form("Éva Two", "ÉVA@mail.com", Role::Consumer))
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::EmailTaken("éva@mail.com".to_string()));

    market.shutdown().await.unwrap();
}

/// Accounts stored without a usable password hash cannot be signed into.
#[tokio::test]
async fn test_account_without_password_hash_rejects_sign_in() {
    let market = start();
    market
        .users
        .create_user(UserCreate {
            name: "Importado".to_string(),
            email: "importado@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Consumer,
            phone: None,
            address: None,
            photo_url: None,
            location: None,
            price_per_liter: None,
            online: false,
        })
        .await
        .unwrap();

    assert_eq!(
        market
            .auth
            .sign_in("importado@example.com", PASSWORD)
            .await
            .unwrap_err(),
        AuthError::InvalidCredentials
    );

    market.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_supplier_filters_against_the_store() {
    let market = start();
    let suppliers = register_sample_suppliers(&market).await;

    let online = market
        .suppliers
        .nearby(
            HOME,
            &SupplierFilters {
                online_only: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(online.len(), 1);
    assert_eq!(online[0].id(), suppliers[0]);

    let cheap = market
        .suppliers
        .nearby(
            SAMPLE_SUPPLIERS[1].location,
            &SupplierFilters {
                max_price: Some(110.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cheap.len(), 1);
    assert_eq!(cheap[0].user.name, "Fornecedor A");

    market.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_seeded_suppliers_can_sign_in() {
    let market = start();
    let seeded = market.seed_suppliers().await.unwrap();
    assert_eq!(seeded.len(), 12);

    let suppliers = market.users.suppliers().await.unwrap();
    let prices: Vec<f64> = suppliers
        .iter()
        .map(|s| s.price_per_liter.unwrap())
        .collect();
    assert_eq!(prices[0], 10.0);
    assert_eq!(prices[11], 54.0);
    assert!(suppliers.iter().all(|s| s.online));

    let user = market
        .auth
        .sign_in("fornecedor1@aguaexpressa.ao", "Fornecedor123")
        .await
        .unwrap();
    assert_eq!(user.id, seeded[0]);

    market.shutdown().await.unwrap();
}
