//! Invoice payment entity - one payment event applied against an invoice.
//!
//! Exactly one row exists per synchronized custom order payment.

use super::custom_order_payment::OrderPaymentMethod;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of methods an invoice payment can carry.
///
/// The three mobile wallets accepted on orders collapse to `MobileMoney`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InvoicePaymentMethod {
    /// Cash
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// Wave, Orange Money or MTN Mobile Money
    #[sea_orm(string_value = "MOBILE_MONEY")]
    MobileMoney,
    /// Bank transfer
    #[sea_orm(string_value = "BANK_TRANSFER")]
    BankTransfer,
    /// Cheque
    #[sea_orm(string_value = "CHECK")]
    Check,
    /// Card
    #[sea_orm(string_value = "CARD")]
    Card,
    /// Anything else
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// Invoice payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_payments")]
pub struct Model {
    /// Unique identifier for the invoice payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Invoice the payment applies to
    pub invoice_id: i64,
    /// Amount applied
    pub amount: i64,
    /// Payment method
    pub method: InvoicePaymentMethod,
    /// Short human-scannable reference; not guaranteed unique
    pub reference: Option<String>,
    /// When the money was received
    pub paid_at: DateTimeUtc,
    /// Notes copied from the order payment
    pub notes: Option<String>,
    /// Staff member that synchronized the payment
    pub created_by: Option<i64>,
    /// When the payment was synchronized
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `InvoicePayment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice payment belongs to one invoice
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

impl From<OrderPaymentMethod> for InvoicePaymentMethod {
    fn from(method: OrderPaymentMethod) -> Self {
        match method {
            OrderPaymentMethod::Cash => Self::Cash,
            OrderPaymentMethod::Wave
            | OrderPaymentMethod::OrangeMoney
            | OrderPaymentMethod::MtnMobileMoney => Self::MobileMoney,
            OrderPaymentMethod::BankTransfer => Self::BankTransfer,
            OrderPaymentMethod::Check => Self::Check,
            OrderPaymentMethod::Card => Self::Card,
            OrderPaymentMethod::Other => Self::Other,
        }
    }
}
