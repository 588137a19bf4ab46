//! Cart line repository. Every operation is scoped to one cart key.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::cart_line::{self, ActiveModel, Entity as CartLineEntity};
use super::entities::product::Entity as ProductEntity;
use crate::domain::{CartKey, CartLine, Product, Quantity};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Lines in creation order, each with its product if it still exists
    async fn lines_with_products(&self, key: &CartKey) -> AppResult<Vec<(CartLine, Option<Product>)>>;

    /// `NotFound` when the line is not in this cart
    async fn set_quantity(&self, key: &CartKey, id: Uuid, qty: Quantity) -> AppResult<()>;

    /// `NotFound` when the line is not in this cart
    async fn delete(&self, key: &CartKey, id: Uuid) -> AppResult<()>;

    async fn clear(&self, key: &CartKey) -> AppResult<u64>;

    /// Every line of every cart as (cart key, line), grouped by key
    async fn list_all(&self) -> AppResult<Vec<(String, CartLine)>>;
}

pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn lines_with_products(&self, key: &CartKey) -> AppResult<Vec<(CartLine, Option<Product>)>> {
        let rows = CartLineEntity::find()
            .filter(cart_line::Column::CartKey.eq(key.as_str()))
            .order_by_asc(cart_line::Column::CreatedAt)
            .order_by_asc(cart_line::Column::Id)
            .find_also_related(ProductEntity)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(line, product)| Ok((CartLine::try_from(line)?, product.map(Product::from))))
            .collect()
    }

    async fn set_quantity(&self, key: &CartKey, id: Uuid, qty: Quantity) -> AppResult<()> {
        set_quantity(&self.db, key, id, qty).await
    }

    async fn delete(&self, key: &CartKey, id: Uuid) -> AppResult<()> {
        let result = CartLineEntity::delete_many()
            .filter(cart_line::Column::Id.eq(id))
            .filter(cart_line::Column::CartKey.eq(key.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Cart item"));
        }
        Ok(())
    }

    async fn clear(&self, key: &CartKey) -> AppResult<u64> {
        clear(&self.db, key).await
    }

    async fn list_all(&self) -> AppResult<Vec<(String, CartLine)>> {
        let rows = CartLineEntity::find()
            .order_by_asc(cart_line::Column::CartKey)
            .order_by_asc(cart_line::Column::CreatedAt)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| {
                let key = row.cart_key.clone();
                Ok((key, CartLine::try_from(row)?))
            })
            .collect()
    }
}

/// Transaction-bound cart repository.
pub struct TxCartRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCartRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_product(&self, key: &CartKey, product_id: &str) -> AppResult<Option<CartLine>> {
        CartLineEntity::find()
            .filter(cart_line::Column::CartKey.eq(key.as_str()))
            .filter(cart_line::Column::ProductId.eq(product_id))
            .one(self.txn)
            .await?
            .map(CartLine::try_from)
            .transpose()
    }

    pub async fn insert(&self, key: &CartKey, product_id: String, qty: Quantity) -> AppResult<CartLine> {
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            cart_key: Set(key.as_str().to_string()),
            product_id: Set(product_id),
            qty: Set(qty.get()),
            created_at: Set(Utc::now()),
        }
        .insert(self.txn)
        .await
        .map_err(|e| AppError::from_insert(e, "Cart item"))?;

        CartLine::try_from(model)
    }

    pub async fn set_quantity(&self, key: &CartKey, id: Uuid, qty: Quantity) -> AppResult<()> {
        set_quantity(self.txn, key, id, qty).await
    }

    pub async fn clear(&self, key: &CartKey) -> AppResult<u64> {
        clear(self.txn, key).await
    }
}

async fn set_quantity<C: ConnectionTrait>(db: &C, key: &CartKey, id: Uuid, qty: Quantity) -> AppResult<()> {
    let result = CartLineEntity::update_many()
        .col_expr(cart_line::Column::Qty, Expr::value(qty.get()))
        .filter(cart_line::Column::Id.eq(id))
        .filter(cart_line::Column::CartKey.eq(key.as_str()))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Cart item"));
    }
    Ok(())
}

async fn clear<C: ConnectionTrait>(db: &C, key: &CartKey) -> AppResult<u64> {
    let result = CartLineEntity::delete_many()
        .filter(cart_line::Column::CartKey.eq(key.as_str()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
