//! Migration: Create cart table.
//!
//! `product_id` deliberately has no foreign key: lines outlive deleted
//! products and read back as "Unknown".

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cart::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cart::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cart::CartKey).string().not_null())
                    .col(ColumnDef::new(Cart::ProductId).string().not_null())
                    .col(ColumnDef::new(Cart::Qty).integer().not_null())
                    .col(
                        ColumnDef::new(Cart::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One line per product per cart
        manager
            .create_index(
                Index::create()
                    .name("idx_cart_key_product")
                    .table(Cart::Table)
                    .col(Cart::CartKey)
                    .col(Cart::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cart::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Cart {
    Table,
    Id,
    CartKey,
    ProductId,
    Qty,
    CreatedAt,
}
