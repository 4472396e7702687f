//! Staff entity - back-office users who record payments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    /// Unique identifier for the staff member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name printed on receipts
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
