//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default JWT token expiration in hours (7 days)
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 168;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 4000;

// =============================================================================
// Database
// =============================================================================

/// Default database URL: a single SQLite file, created on first use
pub const DEFAULT_DATABASE_URL: &str = "sqlite://storefront.db?mode=rwc";

/// Default connection pool size
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

// =============================================================================
// Catalog
// =============================================================================

/// Category assigned to products created without one
pub const DEFAULT_PRODUCT_CATEGORY: &str = "electronics";

/// Stock assigned to products created without one
pub const DEFAULT_PRODUCT_STOCK: i32 = 100;

/// Rating assigned to products created without one
pub const DEFAULT_PRODUCT_RATING: f64 = 4.0;

/// Highest price a product may be listed at
pub const MAX_PRICE: i64 = 1_000_000;

/// Highest allowed product rating
pub const MAX_PRODUCT_RATING: f64 = 5.0;

/// Decimal places kept for prices and totals
pub const MONEY_SCALE: u32 = 2;

/// Name recorded on receipt lines whose product no longer exists
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown";

// =============================================================================
// Cart
// =============================================================================

/// Header carrying the shopper's cart key
pub const CART_SESSION_HEADER: &str = "x-cart-session";

/// Cart used when a request carries no cart key
pub const DEFAULT_CART_KEY: &str = "shared";

/// Maximum cart key length
pub const MAX_CART_KEY_LENGTH: usize = 64;

// =============================================================================
// Checkout
// =============================================================================

/// Header carrying a client-chosen checkout idempotency key
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Maximum idempotency key length
pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 128;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 6;
