//! Custom order item entity - one garment line of a custom order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Garment line database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_order_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning order
    pub custom_order_id: i64,
    /// Garment type (e.g. "Boubou", "Costume")
    pub garment_type: String,
    /// Optional tailoring notes shown next to the garment type
    pub description: Option<String>,
    /// Number of garments, at least one
    pub quantity: i32,
    /// Price per garment
    pub unit_price: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::custom_order::Entity",
        from = "Column::CustomOrderId",
        to = "super::custom_order::Column::Id",
        on_delete = "Cascade"
    )]
    CustomOrder,
}

impl Related<super::custom_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
