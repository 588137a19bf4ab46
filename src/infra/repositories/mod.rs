//! Repository layer - Data access abstraction
//!
//! Each repository exposes a pool-backed store behind an async trait and a
//! `Tx*` variant bound to an open transaction (see `unit_of_work`).

mod cart_repository;
mod category_repository;
pub(crate) mod entities;
mod product_repository;
mod receipt_repository;
mod user_repository;

pub use cart_repository::{CartRepository, CartStore, TxCartRepository};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use product_repository::{ProductRepository, ProductStore, TxProductRepository};
pub use receipt_repository::{ReceiptRepository, ReceiptStore, TxReceiptRepository};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use cart_repository::MockCartRepository;
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use receipt_repository::MockReceiptRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
