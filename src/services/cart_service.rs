//! Cart service - Line items of one shopper's cart.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CartAddOutcome, CartKey, CartView, Quantity};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[async_trait]
pub trait CartService: Send + Sync {
    /// Lines joined with current product data, plus the total
    async fn view(&self, key: &CartKey) -> AppResult<CartView>;

    /// Add `qty` of a product, merging with an existing line
    async fn add(&self, key: CartKey, product_id: String, qty: i64) -> AppResult<CartAddOutcome>;

    async fn update(&self, key: &CartKey, line_id: Uuid, qty: i64) -> AppResult<()>;

    async fn remove(&self, key: &CartKey, line_id: Uuid) -> AppResult<()>;
}

pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn view(&self, key: &CartKey) -> AppResult<CartView> {
        let lines = self.uow.cart().lines_with_products(key).await?;
        CartView::from_lines(lines)
    }

    async fn add(&self, key: CartKey, product_id: String, qty: i64) -> AppResult<CartAddOutcome> {
        let product_id = product_id.trim().to_string();
        if product_id.is_empty() {
            return Err(AppError::validation("productId is required"));
        }
        let qty = Quantity::new(qty)?;

        with_transaction!(self.uow, |ctx| {
            let cart = ctx.cart();
            match cart.find_by_product(&key, &product_id).await? {
                Some(mut line) => {
                    let merged = line.qty.checked_add(qty)?;
                    cart.set_quantity(&key, line.id, merged).await?;
                    line.qty = merged;
                    Ok(CartAddOutcome::Updated(line))
                }
                None => Ok(CartAddOutcome::Created(
                    cart.insert(&key, product_id, qty).await?,
                )),
            }
        })
    }

    async fn update(&self, key: &CartKey, line_id: Uuid, qty: i64) -> AppResult<()> {
        let qty = Quantity::new(qty)?;
        self.uow.cart().set_quantity(key, line_id, qty).await
    }

    async fn remove(&self, key: &CartKey, line_id: Uuid) -> AppResult<()> {
        self.uow.cart().delete(key, line_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockCartRepository;
    use crate::infra::unit_of_work::tests::StubUnitOfWork;

    #[tokio::test]
    async fn test_update_rejects_non_positive_qty() {
        let mut cart = MockCartRepository::new();
        cart.expect_set_quantity().never();

        let uow = StubUnitOfWork { cart: Some(cart), ..Default::default() }.build();
        let service = CartManager::new(uow);

        for qty in [0, -2] {
            let result = service.update(&CartKey::default(), Uuid::new_v4(), qty).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_add_requires_product_id() {
        let uow = StubUnitOfWork::default().build();
        let service = CartManager::new(uow);

        let result = service.add(CartKey::default(), "  ".to_string(), 1).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_remove_missing_line_is_not_found() {
        let mut cart = MockCartRepository::new();
        cart.expect_delete()
            .returning(|_, _| Err(AppError::not_found("Cart item")));

        let uow = StubUnitOfWork { cart: Some(cart), ..Default::default() }.build();
        let service = CartManager::new(uow);

        let result = service.remove(&CartKey::default(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
