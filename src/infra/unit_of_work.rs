//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-statement use cases
//! (add to cart, product update, checkout) inside a single database
//! transaction.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::repositories::{
    CartRepository, CartStore, CategoryRepository, CategoryStore, ProductRepository, ProductStore,
    ReceiptRepository, ReceiptStore, TxCartRepository, TxProductRepository, TxReceiptRepository,
    UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method.
/// Unit tests use `tests::StubUnitOfWork`; transactional flows are covered
/// by integration tests against SQLite.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn products(&self) -> Arc<dyn ProductRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn users(&self) -> Arc<dyn UserRepository>;

    fn cart(&self) -> Arc<dyn CartRepository>;

    fn receipts(&self) -> Arc<dyn ReceiptRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back otherwise. The
    /// closure must only touch the database through the context: the pool
    /// may have a single connection, which the transaction holds.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository::new(self.txn)
    }

    pub fn cart(&self) -> TxCartRepository<'_> {
        TxCartRepository::new(self.txn)
    }

    pub fn receipts(&self) -> TxReceiptRepository<'_> {
        TxReceiptRepository::new(self.txn)
    }
}

/// SeaORM-backed Unit of Work
pub struct Persistence {
    db: DatabaseConnection,
    product_repo: Arc<ProductStore>,
    category_repo: Arc<CategoryStore>,
    user_repo: Arc<UserStore>,
    cart_repo: Arc<CartStore>,
    receipt_repo: Arc<ReceiptStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            product_repo: Arc::new(ProductStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            user_repo: Arc::new(UserStore::new(db.clone())),
            cart_repo: Arc::new(CartStore::new(db.clone())),
            receipt_repo: Arc::new(ReceiptStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn cart(&self) -> Arc<dyn CartRepository> {
        self.cart_repo.clone()
    }

    fn receipts(&self) -> Arc<dyn ReceiptRepository> {
        self.receipt_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let result = f(TransactionContext::new(&txn)).await;

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Run a block inside `UnitOfWork::transaction`. The block evaluates to an
/// `AppResult` and may use `?`.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| {
            Box::pin(async move {
                let result: $crate::errors::AppResult<_> = $body;
                result
            })
        })
        .await
    };
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::infra::repositories::{
        MockCartRepository, MockCategoryRepository, MockProductRepository, MockReceiptRepository,
        MockUserRepository,
    };

    /// Unit of Work over mock repositories. Transactions are unavailable.
    #[derive(Default)]
    pub struct StubUnitOfWork {
        pub products: Option<MockProductRepository>,
        pub categories: Option<MockCategoryRepository>,
        pub users: Option<MockUserRepository>,
        pub cart: Option<MockCartRepository>,
        pub receipts: Option<MockReceiptRepository>,
    }

    pub struct Frozen {
        products: Arc<MockProductRepository>,
        categories: Arc<MockCategoryRepository>,
        users: Arc<MockUserRepository>,
        cart: Arc<MockCartRepository>,
        receipts: Arc<MockReceiptRepository>,
    }

    impl StubUnitOfWork {
        /// Freeze the configured mocks; unset repositories expect no calls.
        pub fn build(self) -> Arc<Frozen> {
            Arc::new(Frozen {
                products: Arc::new(self.products.unwrap_or_default()),
                categories: Arc::new(self.categories.unwrap_or_default()),
                users: Arc::new(self.users.unwrap_or_default()),
                cart: Arc::new(self.cart.unwrap_or_default()),
                receipts: Arc::new(self.receipts.unwrap_or_default()),
            })
        }
    }

    #[async_trait]
    impl UnitOfWork for Frozen {
        fn products(&self) -> Arc<dyn ProductRepository> {
            self.products.clone()
        }

        fn categories(&self) -> Arc<dyn CategoryRepository> {
            self.categories.clone()
        }

        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn cart(&self) -> Arc<dyn CartRepository> {
            self.cart.clone()
        }

        fn receipts(&self) -> Arc<dyn ReceiptRepository> {
            self.receipts.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            Err(AppError::internal("transactions are not available in unit tests"))
        }
    }
}
