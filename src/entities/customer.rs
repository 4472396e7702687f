//! Customer entity - the storefront customer a custom order is placed for.
//!
//! Customer rows are owned by the wider platform; billing only reads them to
//! snapshot contact details onto invoices and receipts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name; may be empty for walk-in customers
    pub name: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Contact e-mail address
    pub email: Option<String>,
    /// City, used to build the billing address
    pub city: Option<String>,
    /// Country, used to build the billing address
    pub country: Option<String>,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer has many custom orders
    #[sea_orm(has_many = "super::custom_order::Entity")]
    CustomOrders,
}

impl Related<super::custom_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
