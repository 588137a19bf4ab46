//! Cart line database entity.
//!
//! `product_id` is a plain reference, not a foreign key: removing a product
//! leaves its cart lines in place.

use sea_orm::entity::prelude::*;

use crate::domain::{CartLine, Quantity};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cart")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cart_key: String,
    pub product_id: String,
    pub qty: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for CartLine {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let qty = Quantity::new(model.qty.into())
            .map_err(|_| AppError::internal(format!("cart line {} has qty {}", model.id, model.qty)))?;

        Ok(CartLine {
            id: model.id,
            product_id: model.product_id,
            qty,
            created_at: model.created_at,
        })
    }
}
