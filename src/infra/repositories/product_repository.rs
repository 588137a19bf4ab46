//! Product repository.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{money, NewProduct, Product, ProductFilter, ProductSort};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products matching every predicate of the filter, in filter order
    async fn list(&self, filter: ProductFilter) -> AppResult<Vec<Product>>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Product>>;

    /// Batch lookup; unknown ids are simply absent from the result
    async fn find_many(&self, ids: Vec<String>) -> AppResult<Vec<Product>>;

    async fn insert(&self, product: NewProduct) -> AppResult<Product>;

    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// Pool-backed product repository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list(&self, filter: ProductFilter) -> AppResult<Vec<Product>> {
        let models = filtered(&filter).all(&self.db).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Product>> {
        find_by_id(&self.db, id).await
    }

    async fn find_many(&self, ids: Vec<String>) -> AppResult<Vec<Product>> {
        find_many(&self.db, ids).await
    }

    async fn insert(&self, product: NewProduct) -> AppResult<Product> {
        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(product.name),
            price: Set(money::to_storage(product.price)),
            description: Set(product.description),
            category: Set(product.category),
            image: Set(product.image),
            stock: Set(product.stock),
            rating: Set(product.rating),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_insert(e, "Product"))?;

        Ok(Product::from(model))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Product"));
        }
        Ok(())
    }
}

/// Transaction-bound product repository.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Product>> {
        find_by_id(self.txn, id).await
    }

    pub async fn find_many(&self, ids: Vec<String>) -> AppResult<Vec<Product>> {
        find_many(self.txn, ids).await
    }

    /// Overwrite every column of an existing product
    pub async fn save(&self, product: Product) -> AppResult<Product> {
        save(self.txn, product).await
    }
}

fn filtered(filter: &ProductFilter) -> Select<ProductEntity> {
    let mut query = ProductEntity::find();

    // SQLite's LOWER() folds ASCII only, so the match is ASCII case-insensitive
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(&search.to_ascii_lowercase()));
        query = query.filter(
            Condition::any()
                .add(lower_like(product::Column::Name, &pattern))
                .add(lower_like(product::Column::Description, &pattern)),
        );
    }
    if let Some(category) = &filter.category {
        query = query.filter(product::Column::Category.eq(category.as_str()));
    }
    if let Some(min) = filter.min_price {
        query = query.filter(product::Column::Price.gte(money::to_storage(min)));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(product::Column::Price.lte(money::to_storage(max)));
    }

    let query = match filter.sort {
        ProductSort::NameAsc => query,
        ProductSort::PriceAsc => query.order_by_asc(product::Column::Price),
        ProductSort::PriceDesc => query.order_by_desc(product::Column::Price),
        ProductSort::RatingDesc => query.order_by_desc(product::Column::Rating),
    };

    query
        .order_by_asc(product::Column::Name)
        .order_by_asc(product::Column::Id)
}

fn lower_like(column: product::Column, pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn find_by_id<C: ConnectionTrait>(db: &C, id: &str) -> AppResult<Option<Product>> {
    let model = ProductEntity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(Product::from))
}

async fn find_many<C: ConnectionTrait>(db: &C, ids: Vec<String>) -> AppResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let models = ProductEntity::find()
        .filter(product::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(models.into_iter().map(Product::from).collect())
}

async fn save<C: ConnectionTrait>(db: &C, product: Product) -> AppResult<Product> {
    let result = ActiveModel {
        id: Set(product.id),
        name: Set(product.name),
        price: Set(money::to_storage(product.price)),
        description: Set(product.description),
        category: Set(product.category),
        image: Set(product.image),
        stock: Set(product.stock),
        rating: Set(product.rating),
    }
    .update(db)
    .await;

    match result {
        Ok(model) => Ok(Product::from(model)),
        Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Product")),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("lamp"), "lamp");
    }
}
