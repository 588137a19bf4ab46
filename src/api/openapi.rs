//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, cart_handler, catalog_handler, checkout_handler, health_handler,
};
use crate::domain::{
    Buyer, CartItem, CartLine, CartView, Category, CreateProduct, Product, Receipt, ReceiptLine,
    UpdateProduct, UserProfile, UserSummary,
};
use crate::services::AuthSession;
use crate::types::SuccessResponse;

/// OpenAPI documentation for the storefront API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Catalog, cart, checkout and accounts for a small storefront",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    ),
    paths(
        health_handler::health,
        // Catalog
        catalog_handler::list_products,
        catalog_handler::get_product,
        catalog_handler::create_product,
        catalog_handler::update_product,
        catalog_handler::delete_product,
        catalog_handler::list_categories,
        // Accounts
        auth_handler::register,
        auth_handler::login,
        auth_handler::profile,
        // Cart
        cart_handler::view_cart,
        cart_handler::add_to_cart,
        cart_handler::update_line,
        cart_handler::remove_line,
        // Checkout
        checkout_handler::checkout,
        checkout_handler::list_receipts,
        checkout_handler::get_receipt,
    ),
    components(
        schemas(
            Product,
            Category,
            CreateProduct,
            UpdateProduct,
            CartLine,
            CartItem,
            CartView,
            Buyer,
            Receipt,
            ReceiptLine,
            UserSummary,
            UserProfile,
            AuthSession,
            SuccessResponse,
            health_handler::HealthResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            cart_handler::AddToCartRequest,
            cart_handler::UpdateCartRequest,
            checkout_handler::CheckoutItemRequest,
            checkout_handler::CheckoutRequest,
            checkout_handler::ReceiptResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Catalog", description = "Products and categories"),
        (name = "Accounts", description = "Registration, login and profile"),
        (name = "Cart", description = "Per-session shopping cart"),
        (name = "Checkout", description = "Orders and receipts")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT returned by /api/register or /api/login"))
                        .build(),
                ),
            );
        }
    }
}
