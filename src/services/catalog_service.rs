//! Catalog service - Product browsing and administration.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Category, CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_products(&self, filter: ProductFilter) -> AppResult<Vec<Product>>;

    async fn get_product(&self, id: &str) -> AppResult<Product>;

    async fn create_product(&self, draft: CreateProduct) -> AppResult<Product>;

    /// Partial update; absent fields keep their value
    async fn update_product(&self, id: String, patch: UpdateProduct) -> AppResult<Product>;

    async fn delete_product(&self, id: &str) -> AppResult<()>;

    async fn list_categories(&self) -> AppResult<Vec<Category>>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_products(&self, filter: ProductFilter) -> AppResult<Vec<Product>> {
        self.uow.products().list(filter).await
    }

    async fn get_product(&self, id: &str) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn create_product(&self, draft: CreateProduct) -> AppResult<Product> {
        let product = self.uow.products().insert(draft.into_new_product()?).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    async fn update_product(&self, id: String, patch: UpdateProduct) -> AppResult<Product> {
        let changes = patch.into_changes()?;

        with_transaction!(self.uow, |ctx| {
            let mut product = ctx
                .products()
                .find_by_id(&id)
                .await?
                .ok_or_not_found("Product")?;
            changes.apply(&mut product);
            ctx.products().save(product).await
        })
    }

    async fn delete_product(&self, id: &str) -> AppResult<()> {
        self.uow.products().delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::repositories::{MockCategoryRepository, MockProductRepository};
    use crate::infra::unit_of_work::tests::StubUnitOfWork;

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let uow = StubUnitOfWork { products: Some(products), ..Default::default() }.build();
        let catalog = CatalogManager::new(uow);

        let result = catalog.get_product("p404").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_validates_before_insert() {
        let mut products = MockProductRepository::new();
        products.expect_insert().never();

        let uow = StubUnitOfWork { products: Some(products), ..Default::default() }.build();
        let catalog = CatalogManager::new(uow);

        let result = catalog
            .create_product(CreateProduct {
                name: Some("Lamp".to_string()),
                price: Some(-1.0),
                description: Some("Bright".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_patch_without_transaction() {
        let uow = StubUnitOfWork::default().build();
        let catalog = CatalogManager::new(uow);

        let result = catalog
            .update_product(
                "p1".to_string(),
                UpdateProduct {
                    rating: Some(9.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_categories_passes_through() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_list().returning(|| {
            Ok(vec![Category {
                id: "books".to_string(),
                name: "Books".to_string(),
                description: "Fiction, Non-fiction, Educational".to_string(),
            }])
        });

        let uow = StubUnitOfWork { categories: Some(categories), ..Default::default() }.build();
        let catalog = CatalogManager::new(uow);

        let list = catalog.list_categories().await.unwrap();
        assert_eq!(list[0].id, "books");
    }
}
