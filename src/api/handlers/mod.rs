//! HTTP request handlers.

pub mod auth_handler;
pub mod cart_handler;
pub mod catalog_handler;
pub mod checkout_handler;
pub mod health_handler;

pub use auth_handler::{account_routes, auth_routes};
pub use cart_handler::cart_routes;
pub use catalog_handler::catalog_routes;
pub use checkout_handler::checkout_routes;
pub use health_handler::health_routes;
