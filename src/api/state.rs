//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, CartService, CatalogService, CheckoutService, ServiceContainer, Services,
};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub cart_service: Arc<dyn CartService>,
    pub checkout_service: Arc<dyn CheckoutService>,
    /// Used directly by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the production services over `database`.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(&container, database)
    }

    /// Build state from any service container (mocks included).
    pub fn new(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            catalog_service: container.catalog(),
            cart_service: container.cart(),
            checkout_service: container.checkout(),
            database,
        }
    }
}
