//! Custom order entity - a bespoke tailoring order.
//!
//! A custom order exclusively owns its garment items and the payments recorded
//! against it. At most one invoice is ever derived from it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Custom order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-facing order number
    #[sea_orm(unique)]
    pub order_number: String,
    /// Customer the order is made for, if known
    pub customer_id: Option<i64>,
    /// When the order was taken
    pub order_date: DateTimeUtc,
    /// Promised pickup date; becomes the invoice due date
    pub pickup_date: Option<DateTimeUtc>,
    /// Cost of fabric and supplies, billed as a separate invoice line
    pub material_cost: i64,
    /// Free-form notes from the atelier
    pub notes: Option<String>,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `CustomOrder` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order may belong to a customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_delete = "SetNull"
    )]
    Customer,
    /// One order has many garment items
    #[sea_orm(has_many = "super::custom_order_item::Entity")]
    Items,
    /// One order has many recorded payments
    #[sea_orm(has_many = "super::custom_order_payment::Entity")]
    Payments,
    /// One order has at most one invoice
    #[sea_orm(has_one = "super::invoice::Entity")]
    Invoice,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::custom_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::custom_order_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
