use std::sync::Arc;

use redb::Database;
use tokio::task::JoinHandle;

use crate::accounts::AccountStorage;
use crate::auth::JwtService;
use crate::catalog::{CatalogStorage, GigService, SearchEngine};
use crate::core::{Config, Result};
use crate::live::{LiveHub, spawn_order_forwarder};
use crate::notify::{FanoutEmitter, LiveEmitter, LogEmitter};
use crate::orders::{OrderStorage, OrdersManager};
use crate::payment::{PaymentGateway, StripeGateway};

/// Shared server state
///
/// Cheap to clone: every service is an `Arc` or wraps one.
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable configuration |
/// | catalog / accounts | gig and profile stores |
/// | orders | order lifecycle manager |
/// | search | ranking engine |
/// | gigs | seller-facing gig writes |
/// | live | per-user event fan-out |
/// | gateway | payment gateway, absent without a Stripe key |
/// | jwt_service | bearer token validation |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub catalog: CatalogStorage,
    pub accounts: AccountStorage,
    pub orders: Arc<OrdersManager>,
    pub search: SearchEngine,
    pub gigs: GigService,
    pub live: LiveHub,
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub jwt_service: Arc<JwtService>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("environment", &self.config.environment)
            .field("gateway", &self.gateway.is_some())
            .finish()
    }
}

impl ServerState {
    /// Open the database under the work directory and wire every service
    pub fn initialize(config: &Config) -> Result<Self> {
        let db = crate::db::open(config.db_path())?;
        let gateway = config.stripe.as_ref().map(|stripe| {
            Arc::new(StripeGateway::new(&stripe.secret_key, &stripe.currency))
                as Arc<dyn PaymentGateway>
        });
        if gateway.is_none() {
            tracing::warn!("STRIPE_SECRET_KEY not set, orders are created without checkout");
        }
        Self::with_database(config.clone(), db, gateway)
    }

    /// Wire services over an already opened database
    pub fn with_database(
        config: Config,
        db: Arc<Database>,
        gateway: Option<Arc<dyn PaymentGateway>>,
    ) -> Result<Self> {
        let catalog = CatalogStorage::new(db.clone())?;
        let accounts = AccountStorage::new(db.clone())?;
        let order_storage = OrderStorage::new(db)?;

        let live = LiveHub::new();
        let notifier = FanoutEmitter::new()
            .with(Arc::new(LogEmitter))
            .with(Arc::new(LiveEmitter::new(live.clone())));
        let orders = OrdersManager::new(
            order_storage,
            catalog.clone(),
            accounts.clone(),
            Arc::new(notifier),
        );
        let jwt_service = JwtService::with_config(config.jwt.clone())?;

        Ok(Self {
            search: SearchEngine::new(catalog.clone(), accounts.clone()),
            gigs: GigService::new(catalog.clone(), accounts.clone()),
            config: Arc::new(config),
            catalog,
            accounts,
            orders: Arc::new(orders),
            live,
            gateway,
            jwt_service: Arc::new(jwt_service),
        })
    }

    /// Start the live forwarder; must run inside a tokio runtime
    pub fn start_background_tasks(&self) -> JoinHandle<()> {
        spawn_order_forwarder(
            self.live.clone(),
            self.orders.storage().clone(),
            self.orders.subscribe(),
        )
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
