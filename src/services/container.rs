//! Service Container - Centralized service access.
//!
//! Handlers depend on the `ServiceContainer` trait, never on concrete
//! service types, so tests can swap in mocks.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CartManager, CartService, CatalogManager, CatalogService,
    CheckoutManager, CheckoutService,
};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(test)]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(test, automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn cart(&self) -> Arc<dyn CartService>;

    fn checkout(&self) -> Arc<dyn CheckoutService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    catalog_service: Arc<dyn CatalogService>,
    cart_service: Arc<dyn CartService>,
    checkout_service: Arc<dyn CheckoutService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        catalog_service: Arc<dyn CatalogService>,
        cart_service: Arc<dyn CartService>,
        checkout_service: Arc<dyn CheckoutService>,
    ) -> Self {
        Self {
            auth_service,
            catalog_service,
            cart_service,
            checkout_service,
        }
    }

    /// Wire every service over one Unit of Work.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            cart_service: Arc::new(CartManager::new(uow.clone())),
            checkout_service: Arc::new(CheckoutManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn cart(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    fn checkout(&self) -> Arc<dyn CheckoutService> {
        self.checkout_service.clone()
    }
}
