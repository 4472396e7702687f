//! Invoice item entity - one ordered line of an invoice.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice line database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning invoice
    pub invoice_id: i64,
    /// Text printed on the line
    pub description: String,
    /// Quantity billed
    pub quantity: i32,
    /// Price per unit
    pub unit_price: i64,
    /// `unit_price * quantity`
    pub total: i64,
    /// Zero-based display order
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id",
        on_delete = "Cascade"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
