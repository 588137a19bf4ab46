//! Catalog entities: products, categories and the typed listing filter.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::money;
use crate::config::{
    DEFAULT_PRODUCT_CATEGORY, DEFAULT_PRODUCT_RATING, DEFAULT_PRODUCT_STOCK, MAX_PRODUCT_RATING,
};
use crate::errors::{AppError, AppResult};

/// Product offered in the storefront
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Product {
    #[schema(example = "p1")]
    pub id: String,
    #[schema(example = "Wireless Headphones")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 49.99)]
    pub price: Decimal,
    pub description: String,
    #[schema(example = "electronics")]
    pub category: String,
    pub image: Option<String>,
    /// Informational only; checkout never decrements it
    pub stock: i32,
    #[schema(example = 4.5)]
    pub rating: f64,
}

/// Product category (seeded reference data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[schema(example = "electronics")]
    pub id: String,
    #[schema(example = "Electronics")]
    pub name: String,
    pub description: String,
}

/// Product creation request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(max = 200, message = "name is too long"))]
    #[schema(example = "Desk Lamp")]
    pub name: Option<String>,
    #[schema(example = 24.5)]
    pub price: Option<f64>,
    #[validate(length(max = 5000, message = "description is too long"))]
    #[schema(example = "Adjustable LED lamp")]
    pub description: Option<String>,
    /// Defaults to `electronics`
    pub category: Option<String>,
    pub image: Option<String>,
    /// Defaults to 100
    pub stock: Option<i64>,
    /// Defaults to 4.0
    pub rating: Option<f64>,
}

/// Validated product attributes ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category: String,
    pub image: Option<String>,
    pub stock: i32,
    pub rating: f64,
}

impl CreateProduct {
    /// Validate the request and fill in defaults.
    pub fn into_new_product(self) -> AppResult<NewProduct> {
        let price = self
            .price
            .ok_or_else(|| AppError::validation("price is required"))?;

        Ok(NewProduct {
            name: required_text(self.name, "name")?,
            price: money::positive_price(price, "price")?,
            description: required_text(self.description, "description")?,
            category: optional_text(self.category)
                .unwrap_or_else(|| DEFAULT_PRODUCT_CATEGORY.to_string()),
            image: optional_text(self.image),
            stock: self.stock.map(stock).transpose()?.unwrap_or(DEFAULT_PRODUCT_STOCK),
            rating: self
                .rating
                .map(rating)
                .transpose()?
                .unwrap_or(DEFAULT_PRODUCT_RATING),
        })
    }
}

/// Partial product update. Absent (or null) fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(max = 200, message = "name is too long"))]
    pub name: Option<String>,
    pub price: Option<f64>,
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<i64>,
    pub rating: Option<f64>,
}

/// Validated patch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<i32>,
    pub rating: Option<f64>,
}

impl UpdateProduct {
    pub fn into_changes(self) -> AppResult<ProductChanges> {
        Ok(ProductChanges {
            name: self.name.map(|v| required_text(Some(v), "name")).transpose()?,
            price: self
                .price
                .map(|v| money::positive_price(v, "price"))
                .transpose()?,
            description: self
                .description
                .map(|v| required_text(Some(v), "description"))
                .transpose()?,
            category: self
                .category
                .map(|v| required_text(Some(v), "category"))
                .transpose()?,
            image: self.image.map(|v| v.trim().to_string()),
            stock: self.stock.map(stock).transpose()?,
            rating: self.rating.map(rating).transpose()?,
        })
    }
}

impl ProductChanges {
    /// Overwrite only the fields present in the patch.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(image) = self.image {
            product.image = Some(image).filter(|v| !v.is_empty());
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
    }
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    optional_text(value).ok_or_else(|| AppError::validation(format!("{} is required", field)))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn stock(value: i64) -> AppResult<i32> {
    i32::try_from(value)
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| AppError::validation("stock must be a non-negative integer"))
}

fn rating(value: f64) -> AppResult<f64> {
    if value.is_finite() && (0.0..=MAX_PRODUCT_RATING).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::validation(format!(
            "rating must be between 0 and {}",
            MAX_PRODUCT_RATING
        )))
    }
}

// =============================================================================
// Listing filter
// =============================================================================

/// Ordering applied to product listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    #[default]
    NameAsc,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl FromStr for ProductSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "name" => Ok(ProductSort::NameAsc),
            "price_low" | "price_asc" => Ok(ProductSort::PriceAsc),
            "price_high" | "price_desc" => Ok(ProductSort::PriceDesc),
            "rating" => Ok(ProductSort::RatingDesc),
            other => Err(AppError::validation(format!("Unknown sort mode: {}", other))),
        }
    }
}

/// Product listing query string. Empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
    /// Exact category id
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// `name` (default), `price_low`, `price_high` or `rating`
    pub sort: Option<String>,
}

/// Conjunction of optional listing predicates plus an ordering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: ProductSort,
}

impl TryFrom<ProductQuery> for ProductFilter {
    type Error = AppError;

    fn try_from(query: ProductQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            search: optional_text(query.search),
            category: optional_text(query.category),
            min_price: price_bound(query.min_price, "minPrice")?,
            max_price: price_bound(query.max_price, "maxPrice")?,
            sort: query.sort.as_deref().unwrap_or_default().parse()?,
        })
    }
}

fn price_bound(value: Option<String>, field: &str) -> AppResult<Option<Decimal>> {
    optional_text(value)
        .map(|raw| {
            Decimal::from_str(&raw)
                .map_err(|_| AppError::validation(format!("{} must be a number", field)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CreateProduct {
        CreateProduct {
            name: Some("Desk Lamp".to_string()),
            price: Some(24.5),
            description: Some("Adjustable LED lamp".to_string()),
            ..Default::default()
        }
    }

    fn sample_product() -> Product {
        Product {
            id: "p1".to_string(),
            name: "Desk Lamp".to_string(),
            price: Decimal::new(2450, 2),
            description: "Adjustable LED lamp".to_string(),
            category: "home".to_string(),
            image: None,
            stock: 12,
            rating: 4.2,
        }
    }

    #[test]
    fn test_create_fills_defaults() {
        let product = draft().into_new_product().unwrap();
        assert_eq!(product.category, "electronics");
        assert_eq!(product.stock, 100);
        assert_eq!(product.rating, 4.0);
        assert_eq!(product.price, Decimal::new(2450, 2));
    }

    #[test]
    fn test_create_requires_fields() {
        for broken in [
            CreateProduct { name: None, ..draft() },
            CreateProduct { name: Some("   ".to_string()), ..draft() },
            CreateProduct { price: None, ..draft() },
            CreateProduct { price: Some(0.0), ..draft() },
            CreateProduct { description: None, ..draft() },
            CreateProduct { stock: Some(-1), ..draft() },
            CreateProduct { rating: Some(5.5), ..draft() },
        ] {
            assert!(matches!(broken.into_new_product(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut product = sample_product();
        let changes = UpdateProduct {
            price: Some(30.0),
            ..Default::default()
        }
        .into_changes()
        .unwrap();
        changes.apply(&mut product);

        assert_eq!(product.price, Decimal::new(3000, 2));
        assert_eq!(product.name, "Desk Lamp");
        assert_eq!(product.stock, 12);
    }

    #[test]
    fn test_patch_zero_stock_is_an_update() {
        let mut product = sample_product();
        let changes = UpdateProduct {
            stock: Some(0),
            ..Default::default()
        }
        .into_changes()
        .unwrap();
        changes.apply(&mut product);
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_sort_tokens() {
        assert_eq!("".parse::<ProductSort>().unwrap(), ProductSort::NameAsc);
        assert_eq!("price_low".parse::<ProductSort>().unwrap(), ProductSort::PriceAsc);
        assert_eq!("price_high".parse::<ProductSort>().unwrap(), ProductSort::PriceDesc);
        assert_eq!("rating".parse::<ProductSort>().unwrap(), ProductSort::RatingDesc);
        assert!("cheapest".parse::<ProductSort>().is_err());
    }

    #[test]
    fn test_query_blank_params_are_absent() {
        let filter = ProductFilter::try_from(ProductQuery {
            search: Some("".to_string()),
            category: Some(" ".to_string()),
            min_price: Some("".to_string()),
            max_price: Some("100".to_string()),
            sort: Some("".to_string()),
        })
        .unwrap();

        assert_eq!(
            filter,
            ProductFilter {
                max_price: Some(Decimal::new(100, 0)),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_query_rejects_bad_price() {
        let result = ProductFilter::try_from(ProductQuery {
            min_price: Some("cheap".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
