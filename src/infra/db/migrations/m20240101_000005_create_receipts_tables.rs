//! Migration: Create receipts and receipt_items tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Receipts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Receipts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Receipts::BuyerName).string().null())
                    .col(ColumnDef::new(Receipts::BuyerEmail).string().null())
                    .col(ColumnDef::new(Receipts::Total).double().not_null())
                    .col(
                        ColumnDef::new(Receipts::IdempotencyKey)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Receipts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_receipts_user")
                            .from(Receipts::Table, Receipts::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_receipts_user_id")
                    .table(Receipts::Table)
                    .col(Receipts::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReceiptItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReceiptItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReceiptItems::ReceiptId).uuid().not_null())
                    .col(ColumnDef::new(ReceiptItems::Position).integer().not_null())
                    .col(ColumnDef::new(ReceiptItems::ProductId).string().not_null())
                    .col(ColumnDef::new(ReceiptItems::Name).string().not_null())
                    .col(ColumnDef::new(ReceiptItems::Qty).integer().not_null())
                    .col(ColumnDef::new(ReceiptItems::UnitPrice).double().not_null())
                    .col(ColumnDef::new(ReceiptItems::Subtotal).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_receipt_items_receipt")
                            .from(ReceiptItems::Table, ReceiptItems::ReceiptId)
                            .to(Receipts::Table, Receipts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_receipt_items_receipt_id")
                    .table(ReceiptItems::Table)
                    .col(ReceiptItems::ReceiptId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReceiptItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Receipts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Receipts {
    Table,
    Id,
    UserId,
    BuyerName,
    BuyerEmail,
    Total,
    IdempotencyKey,
    CreatedAt,
}

#[derive(Iden)]
enum ReceiptItems {
    Table,
    Id,
    ReceiptId,
    Position,
    ProductId,
    Name,
    Qty,
    UnitPrice,
    Subtotal,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
