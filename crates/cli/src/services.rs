use std::sync::Arc;

use anyhow::Context;

use supplier_core::{Clock, SystemClock};
use supplier_infra::AppConfig;
use supplier_infra::Argon2PasswordHasher;
use supplier_infra::store::PostgresStore;
use supplier_infra::workflow::{
    CatalogAdmin, InviteAdmin, InviteGate, LoginService, OrderWorkflow, RegistrationService,
    StockReconciler, UserAdmin,
};

/// Every workflow wired to one PostgreSQL pool.
pub struct Services {
    pub orders: OrderWorkflow<PostgresStore, PostgresStore>,
    pub registration: RegistrationService<PostgresStore, PostgresStore>,
    pub login: LoginService<PostgresStore>,
    pub catalog: CatalogAdmin<PostgresStore>,
    pub users: UserAdmin<PostgresStore>,
    pub invites: InviteAdmin<PostgresStore>,
}

impl Services {
    pub async fn connect() -> anyhow::Result<Self> {
        let config = AppConfig::load().context("invalid configuration")?;
        config.require_database_url()?;

        let store = Arc::new(
            PostgresStore::connect(&config)
                .await
                .context("failed to connect to database")?,
        );
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let hasher = Arc::new(Argon2PasswordHasher::new());

        let reconciler = StockReconciler::new(Arc::clone(&store), config.reservation_attempts);
        let gate = InviteGate::new(Arc::clone(&store), Arc::clone(&clock));

        Ok(Self {
            orders: OrderWorkflow::new(reconciler, Arc::clone(&store), Arc::clone(&clock)),
            registration: RegistrationService::new(Arc::clone(&store), gate, hasher.clone()),
            login: LoginService::new(
                Arc::clone(&store),
                hasher.clone(),
                Arc::clone(&clock),
                config.token_ttl(),
            ),
            catalog: CatalogAdmin::new(Arc::clone(&store)),
            users: UserAdmin::new(Arc::clone(&store), hasher),
            invites: InviteAdmin::new(Arc::clone(&store), clock, config.invite_ttl()),
        })
    }
}
