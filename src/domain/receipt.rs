//! Receipts: immutable records of completed checkouts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::cart::Quantity;
use super::money;
use crate::config::UNKNOWN_PRODUCT_NAME;
use crate::errors::AppResult;

/// Buyer details typed at checkout. Informational, never verified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Buyer {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Buyer {
    /// Blank strings are stored as absent.
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            name: clean(name),
            email: clean(email),
        }
    }
}

/// One requested (product, quantity) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedItem {
    pub product_id: String,
    pub qty: Quantity,
}

/// Authoritative product name and price at checkout time
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSnapshot {
    pub name: String,
    pub price: Decimal,
}

/// Line captured on a receipt
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub product_id: String,
    pub name: String,
    pub qty: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(rename = "subTotal", with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
}

/// Completed checkout
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Receipt {
    pub id: Uuid,
    #[serde(skip)]
    pub user_id: Uuid,
    pub buyer: Buyer,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 25.0)]
    pub total: Decimal,
    pub items: Vec<ReceiptLine>,
    #[serde(skip)]
    pub idempotency_key: Option<String>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    /// Price the requested items against the catalog snapshot.
    ///
    /// Items whose product is missing from `catalog` are kept on the
    /// receipt at price zero under the name "Unknown". Totals that do not
    /// fit a decimal are a validation error.
    pub fn price(
        user_id: Uuid,
        buyer: Buyer,
        items: &[RequestedItem],
        catalog: &HashMap<String, PriceSnapshot>,
        idempotency_key: Option<String>,
    ) -> AppResult<Self> {
        let lines: Vec<ReceiptLine> = items
            .iter()
            .map(|item| -> AppResult<ReceiptLine> {
                let (name, price) = match catalog.get(&item.product_id) {
                    Some(snapshot) => (snapshot.name.clone(), snapshot.price),
                    None => (UNKNOWN_PRODUCT_NAME.to_string(), Decimal::ZERO),
                };
                Ok(ReceiptLine {
                    product_id: item.product_id.clone(),
                    name,
                    qty: item.qty.get(),
                    price,
                    subtotal: money::line_total(price, item.qty.get())?,
                })
            })
            .collect::<AppResult<_>>()?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            buyer,
            total: money::checked_sum(lines.iter().map(|line| line.subtotal))?,
            items: lines,
            idempotency_key,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, qty: i64) -> RequestedItem {
        RequestedItem {
            product_id: product_id.to_string(),
            qty: Quantity::new(qty).unwrap(),
        }
    }

    fn catalog() -> HashMap<String, PriceSnapshot> {
        HashMap::from([
            (
                "p1".to_string(),
                PriceSnapshot {
                    name: "Notebook".to_string(),
                    price: Decimal::new(10, 0),
                },
            ),
            (
                "p2".to_string(),
                PriceSnapshot {
                    name: "Pen".to_string(),
                    price: Decimal::new(5, 0),
                },
            ),
        ])
    }

    #[test]
    fn test_price_totals_lines() {
        let receipt = Receipt::price(
            Uuid::new_v4(),
            Buyer::default(),
            &[item("p1", 2), item("p2", 1)],
            &catalog(),
            None,
        )
        .unwrap();

        assert_eq!(receipt.total, Decimal::new(2500, 2));
        assert_eq!(receipt.items[0].subtotal, Decimal::new(2000, 2));
        assert_eq!(receipt.items[1].subtotal, Decimal::new(500, 2));
        assert_eq!(receipt.items[0].name, "Notebook");
    }

    #[test]
    fn test_unknown_product_priced_at_zero() {
        let receipt = Receipt::price(
            Uuid::new_v4(),
            Buyer::default(),
            &[item("p1", 1), item("ghost", 4)],
            &catalog(),
            None,
        )
        .unwrap();

        assert_eq!(receipt.items[1].name, "Unknown");
        assert_eq!(receipt.items[1].price, Decimal::ZERO);
        assert_eq!(receipt.items[1].qty, 4);
        assert_eq!(receipt.total, Decimal::new(10, 0));
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let catalog = HashMap::from([(
            "p1".to_string(),
            PriceSnapshot {
                name: "Yacht".to_string(),
                price: Decimal::MAX,
            },
        )]);
        let result = Receipt::price(
            Uuid::new_v4(),
            Buyer::default(),
            &[item("p1", 2)],
            &catalog,
            None,
        );
        assert!(matches!(result, Err(crate::errors::AppError::Validation(_))));
    }

    #[test]
    fn test_buyer_blank_fields_absent() {
        let buyer = Buyer::new(Some("  ".to_string()), Some(" a@b.co ".to_string()));
        assert_eq!(buyer.name, None);
        assert_eq!(buyer.email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_receipt_json_shape() {
        let receipt = Receipt::price(
            Uuid::new_v4(),
            Buyer::default(),
            &[item("p1", 2)],
            &catalog(),
            Some("key-1".to_string()),
        )
        .unwrap();
        let json = serde_json::to_value(&receipt).unwrap();

        assert_eq!(json["total"], 20.0);
        assert_eq!(json["items"][0]["subTotal"], 20.0);
        assert_eq!(json["items"][0]["productId"], "p1");
        assert!(json.get("timestamp").is_some());
        assert!(json.get("idempotency_key").is_none());
        assert!(json["buyer"]["name"].is_null());
    }
}
