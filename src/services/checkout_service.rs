//! Checkout service - Turns a requested item list into a persisted receipt.
//!
//! Prices always come from the catalog, never from the client. Receipt,
//! line snapshot and cart clearing commit together or not at all.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MAX_IDEMPOTENCY_KEY_LENGTH;
use crate::domain::{Buyer, CartKey, PriceSnapshot, Quantity, Receipt, RequestedItem};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// One requested line as sent by the client
#[derive(Debug, Clone)]
pub struct CheckoutItem {
    pub product_id: String,
    pub qty: i64,
}

/// Everything needed to place an order
#[derive(Debug, Clone, Default)]
pub struct CheckoutOrder {
    pub items: Vec<CheckoutItem>,
    pub buyer: Buyer,
    /// Replays with the same key return the first receipt
    pub idempotency_key: Option<String>,
}

impl CheckoutOrder {
    fn requested_items(&self) -> AppResult<Vec<RequestedItem>> {
        if self.items.is_empty() {
            return Err(AppError::validation("Cart is empty"));
        }

        self.items
            .iter()
            .map(|item| {
                let product_id = item.product_id.trim();
                if product_id.is_empty() {
                    return Err(AppError::validation("Every item needs a productId"));
                }
                Ok(RequestedItem {
                    product_id: product_id.to_string(),
                    qty: Quantity::new(item.qty)?,
                })
            })
            .collect()
    }

    fn idempotency_key(&self) -> AppResult<Option<String>> {
        match self.idempotency_key.as_deref().map(str::trim) {
            None => Ok(None),
            Some(key) if key.is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LENGTH => {
                Err(AppError::validation(format!(
                    "Idempotency-Key must be 1-{} characters",
                    MAX_IDEMPOTENCY_KEY_LENGTH
                )))
            }
            Some(key) => Ok(Some(key.to_string())),
        }
    }
}

#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price the order, persist the receipt and clear the cart, atomically
    async fn checkout(&self, user_id: Uuid, cart: CartKey, order: CheckoutOrder) -> AppResult<Receipt>;

    /// One of the caller's receipts
    async fn get_receipt(&self, user_id: Uuid, receipt_id: Uuid) -> AppResult<Receipt>;

    /// The caller's receipts, newest first
    async fn list_receipts(&self, user_id: Uuid) -> AppResult<Vec<Receipt>>;
}

pub struct CheckoutManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CheckoutManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CheckoutService for CheckoutManager<U> {
    async fn checkout(&self, user_id: Uuid, cart: CartKey, order: CheckoutOrder) -> AppResult<Receipt> {
        let items = order.requested_items()?;
        let idempotency_key = order.idempotency_key()?;
        let buyer = order.buyer;

        let receipt = with_transaction!(self.uow, |ctx| {
            if let Some(key) = &idempotency_key {
                if let Some(existing) = ctx.receipts().find_by_idempotency_key(key).await? {
                    if existing.user_id != user_id {
                        return Err(AppError::conflict("Idempotency key"));
                    }
                    tracing::info!(receipt_id = %existing.id, "Checkout replayed");
                    return Ok(existing);
                }
            }

            let ids: BTreeSet<String> = items.iter().map(|i| i.product_id.clone()).collect();
            let catalog: HashMap<String, PriceSnapshot> = ctx
                .products()
                .find_many(ids.into_iter().collect())
                .await?
                .into_iter()
                .map(|p| {
                    let snapshot = PriceSnapshot {
                        name: p.name,
                        price: p.price,
                    };
                    (p.id, snapshot)
                })
                .collect();

            let receipt = Receipt::price(user_id, buyer, &items, &catalog, idempotency_key)?;
            ctx.receipts().insert(&receipt).await?;
            let cleared = ctx.cart().clear(&cart).await?;

            tracing::info!(
                receipt_id = %receipt.id,
                user_id = %user_id,
                total = %receipt.total,
                lines = receipt.items.len(),
                cleared,
                "Checkout completed"
            );
            Ok(receipt)
        })?;

        Ok(receipt)
    }

    async fn get_receipt(&self, user_id: Uuid, receipt_id: Uuid) -> AppResult<Receipt> {
        self.uow
            .receipts()
            .find_by_id(receipt_id)
            .await?
            .filter(|receipt| receipt.user_id == user_id)
            .ok_or_not_found("Receipt")
    }

    async fn list_receipts(&self, user_id: Uuid) -> AppResult<Vec<Receipt>> {
        self.uow.receipts().list_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockReceiptRepository;
    use crate::infra::unit_of_work::tests::StubUnitOfWork;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn item(product_id: &str, qty: i64) -> CheckoutItem {
        CheckoutItem {
            product_id: product_id.to_string(),
            qty,
        }
    }

    fn receipt_for(user_id: Uuid) -> Receipt {
        Receipt {
            id: Uuid::new_v4(),
            user_id,
            buyer: Buyer::default(),
            total: Decimal::ZERO,
            items: Vec::new(),
            idempotency_key: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_invalid_orders_rejected_before_transaction() {
        let uow = StubUnitOfWork::default().build();
        let service = CheckoutManager::new(uow);

        for items in [vec![], vec![item("p1", 0)], vec![item(" ", 1)], vec![item("p1", -3)]] {
            let order = CheckoutOrder {
                items,
                ..Default::default()
            };
            let result = service.checkout(Uuid::new_v4(), CartKey::default(), order).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_blank_idempotency_key_rejected() {
        let uow = StubUnitOfWork::default().build();
        let service = CheckoutManager::new(uow);

        let order = CheckoutOrder {
            items: vec![item("p1", 1)],
            idempotency_key: Some("  ".to_string()),
            ..Default::default()
        };
        let result = service.checkout(Uuid::new_v4(), CartKey::default(), order).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_foreign_receipt_is_not_found() {
        let owner = Uuid::new_v4();
        let stored = receipt_for(owner);
        let receipt_id = stored.id;

        let mut receipts = MockReceiptRepository::new();
        receipts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let uow = StubUnitOfWork { receipts: Some(receipts), ..Default::default() }.build();
        let service = CheckoutManager::new(uow);

        assert!(service.get_receipt(owner, receipt_id).await.is_ok());
        let result = service.get_receipt(Uuid::new_v4(), receipt_id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
