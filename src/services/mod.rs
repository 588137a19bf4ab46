//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They reach storage only through the Unit of
//! Work, which also scopes multi-statement use cases to one transaction.

mod auth_service;
mod cart_service;
mod catalog_service;
mod checkout_service;
pub mod container;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, AuthSession, Authenticator, Claims, Registration};
pub use cart_service::{CartManager, CartService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use checkout_service::{CheckoutItem, CheckoutManager, CheckoutOrder, CheckoutService};

#[cfg(test)]
pub use container::MockServiceContainer;
