//! Receipt repository. Receipts are append-only: there is no update or
//! delete.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::receipt::{self, Entity as ReceiptEntity};
use super::entities::receipt_item::{self, Entity as ReceiptItemEntity};
use crate::domain::{money, Buyer, Receipt, ReceiptLine};
use crate::errors::AppResult;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Receipt>>;

    /// Receipts of one user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Receipt>>;

    /// Every receipt, newest first
    async fn list_all(&self) -> AppResult<Vec<Receipt>>;
}

pub struct ReceiptStore {
    db: DatabaseConnection,
}

impl ReceiptStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReceiptRepository for ReceiptStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Receipt>> {
        let headers = ReceiptEntity::find_by_id(id).all(&self.db).await?;
        Ok(with_items(&self.db, headers).await?.pop())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Receipt>> {
        let headers = newest_first()
            .filter(receipt::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;
        with_items(&self.db, headers).await
    }

    async fn list_all(&self) -> AppResult<Vec<Receipt>> {
        let headers = newest_first().all(&self.db).await?;
        with_items(&self.db, headers).await
    }
}

/// Transaction-bound receipt repository.
pub struct TxReceiptRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxReceiptRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Option<Receipt>> {
        let headers = ReceiptEntity::find()
            .filter(receipt::Column::IdempotencyKey.eq(key))
            .all(self.txn)
            .await?;
        Ok(with_items(self.txn, headers).await?.pop())
    }

    /// Persist the header and its line snapshot.
    pub async fn insert(&self, receipt: &Receipt) -> AppResult<()> {
        receipt::ActiveModel {
            id: Set(receipt.id),
            user_id: Set(receipt.user_id),
            buyer_name: Set(receipt.buyer.name.clone()),
            buyer_email: Set(receipt.buyer.email.clone()),
            total: Set(money::to_storage(receipt.total)),
            idempotency_key: Set(receipt.idempotency_key.clone()),
            created_at: Set(receipt.created_at),
        }
        .insert(self.txn)
        .await?;

        if receipt.items.is_empty() {
            return Ok(());
        }

        let items = receipt
            .items
            .iter()
            .enumerate()
            .map(|(position, line)| receipt_item::ActiveModel {
                receipt_id: Set(receipt.id),
                position: Set(position as i32),
                product_id: Set(line.product_id.clone()),
                name: Set(line.name.clone()),
                qty: Set(line.qty),
                unit_price: Set(money::to_storage(line.price)),
                subtotal: Set(money::to_storage(line.subtotal)),
                ..Default::default()
            });

        ReceiptItemEntity::insert_many(items).exec(self.txn).await?;
        Ok(())
    }
}

fn newest_first() -> sea_orm::Select<ReceiptEntity> {
    ReceiptEntity::find()
        .order_by_desc(receipt::Column::CreatedAt)
        .order_by_desc(receipt::Column::Id)
}

/// Load the lines of `headers` in one query and assemble receipts,
/// keeping the header order.
async fn with_items<C: ConnectionTrait>(db: &C, headers: Vec<receipt::Model>) -> AppResult<Vec<Receipt>> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
    let rows = ReceiptItemEntity::find()
        .filter(receipt_item::Column::ReceiptId.is_in(ids))
        .order_by_asc(receipt_item::Column::ReceiptId)
        .order_by_asc(receipt_item::Column::Position)
        .all(db)
        .await?;

    let mut lines: HashMap<Uuid, Vec<ReceiptLine>> = HashMap::new();
    for row in rows {
        lines.entry(row.receipt_id).or_default().push(ReceiptLine::from(row));
    }

    Ok(headers
        .into_iter()
        .map(|header| Receipt {
            items: lines.remove(&header.id).unwrap_or_default(),
            id: header.id,
            user_id: header.user_id,
            buyer: Buyer {
                name: header.buyer_name,
                email: header.buyer_email,
            },
            total: money::from_storage(header.total),
            idempotency_key: header.idempotency_key,
            created_at: header.created_at,
        })
        .collect())
}
