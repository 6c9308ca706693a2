use super::session::Session;
use crate::clients::{NotificationClient, OrderClient, UserClient};
use crate::config::AppConfig;
use crate::error::MarketError;
use crate::model::UserId;
use crate::order_actor::OrderContext;
use crate::services::seed::{self, SEED_PASSWORD};
use crate::services::{AuthService, Geocoder, GoogleGeocoder, StaticGeocoder, SupplierSearch};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// The running marketplace: the three store actors, wired together, plus the services
/// that sit on top of them.
///
/// # Architecture
///
/// - **User actor**: accounts, presence and locations (`Context = ()`)
/// - **Notification actor**: per-user inboxes; checks recipients against the user actor
/// - **Order actor**: the order lifecycle; validates parties against the user actor and
///   writes notifications through the notification actor
///
/// # Example
///
/// ```no_run
/// # async fn demo() -> Result<(), agua_expressa::error::MarketError> {
/// use agua_expressa::config::AppConfig;
/// use agua_expressa::lifecycle::Marketplace;
///
/// let market = Marketplace::new(&AppConfig::from_env()?)?;
/// market.seed_suppliers().await?;
///
/// let session = market.sign_in("fornecedor1@aguaexpressa.ao", "Fornecedor123").await?;
/// println!("{} unread", session.unread_count());
///
/// session.sign_out();
/// market.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct Marketplace {
    pub users: UserClient,
    pub orders: OrderClient,
    pub notifications: NotificationClient,
    pub auth: AuthService,
    pub suppliers: SupplierSearch,
    config: AppConfig,
    /// In shutdown order: each actor only depends on the ones after it.
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl Marketplace {
    /// Starts every actor. Uses the Google geocoder when an API key is configured and
    /// an empty [`StaticGeocoder`] otherwise.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn new(config: &AppConfig) -> Result<Self, MarketError> {
        let geocoder: Arc<dyn Geocoder> = match &config.google_maps_api_key {
            Some(key) => Arc::new(GoogleGeocoder::new(config.geocode_url.clone(), key.clone())),
            None => Arc::new(StaticGeocoder::new()),
        };
        Self::with_geocoder(config, geocoder)
    }

    pub fn with_geocoder(
        config: &AppConfig,
        geocoder: Arc<dyn Geocoder>,
    ) -> Result<Self, MarketError> {
        // 1. Create actors
        let (user_actor, users) = crate::user_actor::new(config.channel_buffer);
        let (notification_actor, notifications) =
            crate::notification_actor::new(config.channel_buffer);
        let (order_actor, orders) = crate::order_actor::new(config.channel_buffer);

        // 2. Start them with their context
        let user_handle = tokio::spawn(user_actor.run(()));
        let notification_handle = tokio::spawn(notification_actor.run(users.clone()));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            users: users.clone(),
            notifications: notifications.clone(),
            policy: config.transition_policy,
        }));
        let handles = vec![
            ("order", order_handle),
            ("notification", notification_handle),
            ("user", user_handle),
        ];

        let auth = match AuthService::with_costs(
            users.clone(),
            config.argon2_memory_kib,
            config.argon2_iterations,
        ) {
            Ok(auth) => auth,
            Err(e) => {
                // the actors already hold each other's clients; let them wind down
                for (_, handle) in &handles {
                    handle.abort();
                }
                return Err(e.into());
            }
        };
        let suppliers = SupplierSearch::new(users.clone(), geocoder, config.missing_location);

        info!(policy = ?config.transition_policy, "Marketplace started");
        Ok(Self {
            users,
            orders,
            notifications,
            auth,
            suppliers,
            config: config.clone(),
            handles,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registers the demo suppliers, all sharing [`SEED_PASSWORD`].
    #[instrument(skip(self))]
    pub async fn seed_suppliers(&self) -> Result<Vec<UserId>, MarketError> {
        let password_hash = self.auth.hash_password(SEED_PASSWORD)?;
        let mut rng = StdRng::from_entropy();
        Ok(seed::seed_suppliers(&self.users, &password_hash, &mut rng).await)
    }

    /// Checks the credentials and opens a [`Session`] for the account.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, MarketError> {
        let user = self.auth.sign_in(email, password).await?;
        Session::start(
            user,
            self.users.clone(),
            self.orders.clone(),
            self.notifications.clone(),
        )
        .await
    }

    /// Stops every actor and waits for them to finish.
    ///
    /// Sessions hold clients of their own: sign them out first, or the actors keep
    /// running and this never returns.
    pub async fn shutdown(self) -> Result<(), MarketError> {
        info!("Shutting down marketplace...");

        // Step 1: drop our clients; the order actor then closes, which drops the
        // clients in its context, and so on down the chain.
        let Self {
            users,
            orders,
            notifications,
            auth,
            suppliers,
            handles,
            ..
        } = self;
        drop(orders);
        drop(notifications);
        drop(auth);
        drop(suppliers);
        drop(users);

        // Step 2: wait for the tasks
        for (name, handle) in handles {
            if let Err(e) = handle.await {
                error!(actor = name, error = %e, "Actor task failed");
                return Err(MarketError::Shutdown(format!("{name} actor: {e}")));
            }
        }

        info!("Marketplace shutdown complete.");
        Ok(())
    }
}
