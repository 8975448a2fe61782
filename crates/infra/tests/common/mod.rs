#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use supplier_auth::{Caller, Role};
use supplier_catalog::{Product, Sku};
use supplier_core::{Clock, FixedClock, UserId};
use supplier_infra::Argon2PasswordHasher;
use supplier_infra::store::{
    InMemoryCatalogStore, InMemoryInviteRegistry, InMemoryOrderStore, InMemoryUserStore,
};
use supplier_infra::workflow::{
    CatalogAdmin, InviteAdmin, InviteGate, LoginService, OrderWorkflow, RegistrationService,
    StockReconciler, UserAdmin,
};
use supplier_invites::InviteCode;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub fn sku(s: &str) -> Sku {
    Sku::parse(s).unwrap()
}

pub fn product(code: &str, stock: i64, cents: i64) -> Product {
    Product::new(sku(code), code, Decimal::new(cents, 2), stock).unwrap()
}

pub fn admin() -> Caller {
    Caller::new(UserId::new(1), Role::ADMIN)
}

pub fn user(id: i64) -> Caller {
    Caller::new(UserId::new(id), Role::USER)
}

/// In-memory wiring of every store and workflow around a pinned clock.
pub struct Harness {
    pub clock: Arc<FixedClock>,
    pub catalog: Arc<InMemoryCatalogStore>,
    pub orders: Arc<InMemoryOrderStore>,
    pub invites: Arc<InMemoryInviteRegistry>,
    pub users: Arc<InMemoryUserStore>,
    pub hasher: Arc<Argon2PasswordHasher>,
    pub reservation_attempts: u32,
}

impl Harness {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        let catalog = Arc::new(InMemoryCatalogStore::with_products(products));
        Self {
            clock: Arc::new(FixedClock::new(t0())),
            orders: Arc::new(InMemoryOrderStore::new(Arc::clone(&catalog))),
            catalog,
            invites: Arc::new(InMemoryInviteRegistry::new()),
            users: Arc::new(InMemoryUserStore::new()),
            hasher: Arc::new(Argon2PasswordHasher::with_cost(1024, 1).unwrap()),
            reservation_attempts: 5,
        }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn reconciler(&self) -> StockReconciler<InMemoryCatalogStore> {
        StockReconciler::new(Arc::clone(&self.catalog), self.reservation_attempts)
    }

    pub fn order_workflow(&self) -> OrderWorkflow<InMemoryCatalogStore, InMemoryOrderStore> {
        OrderWorkflow::new(self.reconciler(), Arc::clone(&self.orders), self.clock())
    }

    pub fn gate(&self) -> InviteGate<InMemoryInviteRegistry> {
        InviteGate::new(Arc::clone(&self.invites), self.clock())
    }

    pub fn registration(&self) -> RegistrationService<InMemoryUserStore, InMemoryInviteRegistry> {
        RegistrationService::new(Arc::clone(&self.users), self.gate(), self.hasher.clone())
    }

    pub fn login(&self) -> LoginService<InMemoryUserStore> {
        LoginService::new(
            Arc::clone(&self.users),
            self.hasher.clone(),
            self.clock(),
            Duration::minutes(60),
        )
    }

    pub fn catalog_admin(&self) -> CatalogAdmin<InMemoryCatalogStore> {
        CatalogAdmin::new(Arc::clone(&self.catalog))
    }

    pub fn user_admin(&self) -> UserAdmin<InMemoryUserStore> {
        UserAdmin::new(Arc::clone(&self.users), self.hasher.clone())
    }

    pub fn invite_admin(&self) -> InviteAdmin<InMemoryInviteRegistry> {
        InviteAdmin::new(Arc::clone(&self.invites), self.clock(), Duration::days(3))
    }

    pub async fn seed_invite(&self, code: &str, expires_in: Duration) {
        use supplier_infra::store::InviteRegistry;

        let invite = InviteCode::with_code(code, t0() + expires_in).unwrap();
        self.invites.save(&invite).await.unwrap();
    }

    pub async fn stock(&self, code: &str) -> i64 {
        self.product(code).await.stock_quantity
    }

    pub async fn product(&self, code: &str) -> Product {
        use supplier_infra::store::CatalogStore;

        self.catalog.get_by_sku(&sku(code)).await.unwrap().unwrap()
    }
}
