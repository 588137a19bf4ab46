//! Catalog seed data: four reference categories plus the bundled product
//! list in `data/products.json`.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait};
use serde::Deserialize;

use crate::domain::{money, Category};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::{category, product};

const PRODUCTS_JSON: &str = include_str!("../../../data/products.json");

/// Rows written by a seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: u64,
    pub products: u64,
}

#[derive(Debug, Deserialize)]
struct SeedProduct {
    id: String,
    name: String,
    price: f64,
    description: String,
    category: String,
    image: Option<String>,
    stock: i32,
    rating: f64,
}

fn categories() -> Vec<Category> {
    [
        ("electronics", "Electronics", "Phones, Laptops, Gadgets"),
        ("fashion", "Fashion", "Clothing, Shoes, Accessories"),
        ("home", "Home & Kitchen", "Furniture, Appliances"),
        ("books", "Books", "Fiction, Non-fiction, Educational"),
    ]
    .into_iter()
    .map(|(id, name, description)| Category {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

fn products() -> AppResult<Vec<SeedProduct>> {
    serde_json::from_str(PRODUCTS_JSON)
        .map_err(|e| AppError::internal(format!("Invalid bundled product data: {}", e)))
}

pub(super) async fn seed_catalog(db: &DatabaseConnection, reset: bool) -> AppResult<SeedReport> {
    let seed_products = products()?;
    let txn = db.begin().await?;

    if reset {
        product::Entity::delete_many().exec(&txn).await?;
        category::Entity::delete_many().exec(&txn).await?;
    }

    let mut report = SeedReport::default();

    if category::Entity::find().count(&txn).await? == 0 {
        let rows = categories().into_iter().map(|c| category::ActiveModel {
            id: Set(c.id),
            name: Set(c.name),
            description: Set(c.description),
        });
        report.categories = category::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
    }

    if product::Entity::find().count(&txn).await? == 0 && !seed_products.is_empty() {
        let rows = seed_products.into_iter().map(|p| product::ActiveModel {
            id: Set(p.id),
            name: Set(p.name),
            price: Set(money::to_storage(money::from_storage(p.price))),
            description: Set(p.description),
            category: Set(p.category),
            image: Set(p.image),
            stock: Set(p.stock),
            rating: Set(p.rating),
        });
        report.products = product::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    if report != SeedReport::default() {
        tracing::info!(
            categories = report.categories,
            products = report.products,
            "Seeded catalog"
        );
    }
    Ok(report)
}
