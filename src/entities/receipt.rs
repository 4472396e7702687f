//! Receipt entity - immutable proof of payment.
//!
//! One receipt is issued per synchronized payment. Customer, payment and staff
//! details are copied onto the row so the rendered document never depends on
//! later edits. Receipts are only removed when their payment is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Receipt database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    /// Unique identifier for the receipt
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `REC-DDMMYY-NNNN`
    #[sea_orm(unique)]
    pub receipt_number: String,
    /// Order-side payment this receipt proves
    #[sea_orm(unique)]
    pub custom_order_payment_id: Option<i64>,
    /// Invoice-side payment this receipt proves
    pub invoice_payment_id: Option<i64>,
    /// Invoice the payment was applied to
    pub invoice_id: Option<i64>,
    /// Order the payment was received for
    pub custom_order_id: Option<i64>,
    /// Snapshot of the order number
    pub order_number: Option<String>,
    /// Snapshot of the customer name
    pub customer_name: String,
    /// Snapshot of the customer phone
    pub customer_phone: Option<String>,
    /// Snapshot of the customer e-mail
    pub customer_email: Option<String>,
    /// Amount received
    pub amount: i64,
    /// Method label as printed
    pub payment_method: String,
    /// Short payment reference
    pub payment_reference: Option<String>,
    /// When the money was received
    pub payment_date: DateTimeUtc,
    /// Staff member that issued the receipt
    pub issued_by: Option<i64>,
    /// Snapshot of the staff member's display name
    pub issued_by_name: Option<String>,
    /// When the receipt was issued
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Receipt and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The order-side payment
    #[sea_orm(
        belongs_to = "super::custom_order_payment::Entity",
        from = "Column::CustomOrderPaymentId",
        to = "super::custom_order_payment::Column::Id"
    )]
    CustomOrderPayment,
    /// The invoice-side payment
    #[sea_orm(
        belongs_to = "super::invoice_payment::Entity",
        from = "Column::InvoicePaymentId",
        to = "super::invoice_payment::Column::Id"
    )]
    InvoicePayment,
}

impl Related<super::custom_order_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomOrderPayment.def()
    }
}

impl Related<super::invoice_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoicePayment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
