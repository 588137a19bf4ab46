//! Receipt line database entity. Name and prices are copies taken at
//! checkout time.

use sea_orm::entity::prelude::*;

use crate::domain::{money, ReceiptLine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "receipt_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub receipt_id: Uuid,
    pub position: i32,
    pub product_id: String,
    pub name: String,
    pub qty: i32,
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::receipt::Entity",
        from = "Column::ReceiptId",
        to = "super::receipt::Column::Id"
    )]
    Receipt,
}

impl Related<super::receipt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ReceiptLine {
    fn from(model: Model) -> Self {
        ReceiptLine {
            product_id: model.product_id,
            name: model.name,
            qty: model.qty,
            price: money::from_storage(model.unit_price),
            subtotal: money::from_storage(model.subtotal),
        }
    }
}
