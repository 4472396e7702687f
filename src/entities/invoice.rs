//! Invoice entity - the billing document derived from a custom order.
//!
//! Customer fields are a snapshot taken when the invoice is created. They are
//! never re-read from the customer row, so an issued invoice does not change
//! when the customer later edits their profile.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice lifecycle status.
///
/// Materialized invoices start at `Sent`; `Partial` and `Paid` are derived from
/// the payments applied to the invoice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InvoiceStatus {
    /// Being prepared, not yet issued
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Issued, nothing paid
    #[sea_orm(string_value = "SENT")]
    Sent,
    /// Partly paid
    #[sea_orm(string_value = "PARTIAL")]
    Partial,
    /// Fully paid
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Past its due date
    #[sea_orm(string_value = "OVERDUE")]
    Overdue,
    /// Voided
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Invoice database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `FAC-DDMMYY-NNNN`
    #[sea_orm(unique)]
    pub invoice_number: String,
    /// Source custom order; at most one invoice per order
    #[sea_orm(unique)]
    pub custom_order_id: Option<i64>,
    /// Customer at creation time
    pub customer_id: Option<i64>,
    /// Snapshot of the customer name
    pub customer_name: String,
    /// Snapshot of the customer phone
    pub customer_phone: Option<String>,
    /// Snapshot of the customer e-mail
    pub customer_email: Option<String>,
    /// Snapshot of the customer address (non-empty city/country joined)
    pub customer_address: Option<String>,
    /// When the invoice was issued
    pub issue_date: DateTimeUtc,
    /// When payment is expected
    pub due_date: Option<DateTimeUtc>,
    /// Sum of the garment lines; the material cost is added on top
    pub subtotal: i64,
    /// Tax charged; zero for tailoring invoices
    pub tax_amount: i64,
    /// Delivery fee
    pub shipping_amount: i64,
    /// Discount granted, subtracted from the total
    pub discount_amount: i64,
    /// Amount owed
    pub total: i64,
    /// Sum of all linked invoice payments
    pub amount_paid: i64,
    /// Lifecycle status
    pub status: InvoiceStatus,
    /// When the invoice became `Paid`; cleared if it drops below
    pub paid_date: Option<DateTimeUtc>,
    /// Free-form remarks printed on the invoice
    pub notes: Option<String>,
    /// Staff member that triggered creation
    pub created_by: Option<i64>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the amounts or status were last recomputed
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The order this invoice was derived from
    #[sea_orm(
        belongs_to = "super::custom_order::Entity",
        from = "Column::CustomOrderId",
        to = "super::custom_order::Column::Id",
        on_delete = "SetNull"
    )]
    CustomOrder,
    /// Ordered invoice lines
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    Items,
    /// Payments applied to the invoice
    #[sea_orm(has_many = "super::invoice_payment::Entity")]
    Payments,
}

impl Related<super::custom_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomOrder.def()
    }
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::invoice_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
