//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod cart_line;
pub mod category;
pub mod product;
pub mod receipt;
pub mod receipt_item;
pub mod user;
