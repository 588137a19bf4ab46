//! Cart entities and value objects.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::Product;
use super::money;
use crate::config::{DEFAULT_CART_KEY, MAX_CART_KEY_LENGTH, UNKNOWN_PRODUCT_NAME};
use crate::errors::{AppError, AppResult};

/// Positive line quantity that fits the storage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(value: i64) -> AppResult<Self> {
        i32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .map(Self)
            .ok_or_else(|| AppError::validation("qty must be a positive integer"))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Sum two quantities, rejecting overflow.
    pub fn checked_add(self, other: Quantity) -> AppResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| AppError::validation("qty is too large"))
    }
}

/// Identifies one shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartKey(String);

impl CartKey {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_CART_KEY_LENGTH
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::validation(format!(
                "Cart session must be 1-{} characters of letters, digits, '-' or '_'",
                MAX_CART_KEY_LENGTH
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CartKey {
    fn default() -> Self {
        Self(DEFAULT_CART_KEY.to_string())
    }
}

/// Stored cart line
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: Uuid,
    #[schema(example = "p1")]
    pub product_id: String,
    #[schema(value_type = i32, example = 2)]
    #[serde(serialize_with = "serialize_quantity")]
    pub qty: Quantity,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

fn serialize_quantity<S: serde::Serializer>(qty: &Quantity, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i32(qty.get())
}

/// Result of adding a product to a cart
#[derive(Debug, Clone, PartialEq)]
pub enum CartAddOutcome {
    Created(CartLine),
    Updated(CartLine),
}

/// Cart line joined with the current product data
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: String,
    pub qty: i32,
    /// "Unknown" once the product has been removed from the catalog
    pub name: String,
    /// Null once the product has been removed from the catalog
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
}

/// Cart contents with the running total
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
}

impl CartView {
    /// Join lines with their products. Lines whose product is gone count
    /// as zero towards the total.
    pub fn from_lines(lines: Vec<(CartLine, Option<Product>)>) -> AppResult<Self> {
        let items: Vec<CartItem> = lines
            .into_iter()
            .map(|(line, product)| CartItem {
                id: line.id,
                qty: line.qty.get(),
                name: product
                    .as_ref()
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
                price: product.map(|p| p.price),
                product_id: line.product_id,
            })
            .collect();

        let subtotals = items
            .iter()
            .map(|item| money::line_total(item.price.unwrap_or_default(), item.qty))
            .collect::<AppResult<Vec<_>>>()?;
        let total = money::checked_sum(subtotals)?;

        Ok(Self { items, total })
    }
}
