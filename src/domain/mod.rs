//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the pure rules of the storefront
//! (pricing, cart totals, validation). Nothing here touches the database.

pub mod cart;
pub mod catalog;
pub mod money;
pub mod password;
pub mod receipt;
pub mod user;

pub use cart::{CartAddOutcome, CartItem, CartKey, CartLine, CartView, Quantity};
pub use catalog::{
    Category, CreateProduct, NewProduct, Product, ProductChanges, ProductFilter, ProductQuery,
    ProductSort, UpdateProduct,
};
pub use password::Password;
pub use receipt::{Buyer, PriceSnapshot, Receipt, ReceiptLine, RequestedItem};
pub use user::{normalize_email, NewUser, User, UserProfile, UserSummary};
