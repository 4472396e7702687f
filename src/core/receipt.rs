//! Receipt issuance and lookups.
//!
//! A receipt is issued for every synchronized payment. It carries its own
//! `REC-` number and a copy of the customer, payment and staff details needed
//! to print it, so it reads the same however those records change later.

use crate::{
    core::{
        numbering::{business_date, next_receipt_number},
        order::CustomerSnapshot,
    },
    entities::{
        OrderPaymentMethod, Receipt, Staff, custom_order, custom_order_payment, customer,
        invoice_payment, receipt,
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Everything a receipt is built from.
pub(crate) struct ReceiptContext<'a> {
    pub order: &'a custom_order::Model,
    pub customer: Option<&'a customer::Model>,
    pub payment: &'a custom_order_payment::Model,
    pub invoice_payment: &'a invoice_payment::Model,
    pub actor_id: Option<i64>,
}

/// Printed label for a stored order payment method.
///
/// Values outside the accepted set are printed as stored; a missing method is cash.
#[must_use]
pub fn payment_method_label(method: Option<&str>) -> String {
    match method.map(str::trim).filter(|value| !value.is_empty()) {
        None => OrderPaymentMethod::Cash.label().to_string(),
        Some(value) => value
            .parse::<OrderPaymentMethod>()
            .map_or_else(|_| value.to_string(), |parsed| parsed.label().to_string()),
    }
}

/// Issues the receipt for a payment that has just been mirrored onto its invoice.
pub(crate) async fn emit_receipt<C>(
    db: &C,
    context: ReceiptContext<'_>,
    now: DateTime<Utc>,
) -> Result<receipt::Model>
where
    C: ConnectionTrait,
{
    let receipt_number = next_receipt_number(db, business_date(now)).await?;
    let snapshot = CustomerSnapshot::of(context.customer);
    let issued_by_name = match context.actor_id {
        Some(staff_id) => Staff::find_by_id(staff_id).one(db).await?.map(|staff| staff.name),
        None => None,
    };

    let receipt = receipt::ActiveModel {
        receipt_number: Set(receipt_number),
        custom_order_payment_id: Set(Some(context.payment.id)),
        invoice_payment_id: Set(Some(context.invoice_payment.id)),
        invoice_id: Set(Some(context.invoice_payment.invoice_id)),
        custom_order_id: Set(Some(context.order.id)),
        order_number: Set(Some(context.order.order_number.clone())),
        customer_name: Set(snapshot.name),
        customer_phone: Set(snapshot.phone),
        customer_email: Set(snapshot.email),
        amount: Set(context.payment.amount),
        payment_method: Set(payment_method_label(context.payment.method.as_deref())),
        payment_reference: Set(context.invoice_payment.reference.clone()),
        payment_date: Set(context.payment.paid_at),
        issued_by: Set(context.actor_id),
        issued_by_name: Set(issued_by_name),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(receipt_number = %receipt.receipt_number, "Receipt issued");
    Ok(receipt)
}

/// Finds a receipt by id.
pub async fn get_receipt_by_id<C>(db: &C, receipt_id: i64) -> Result<Option<receipt::Model>>
where
    C: ConnectionTrait,
{
    Receipt::find_by_id(receipt_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a receipt by its `REC-` number.
pub async fn get_receipt_by_number<C>(db: &C, receipt_number: &str) -> Result<Option<receipt::Model>>
where
    C: ConnectionTrait,
{
    Receipt::find()
        .filter(receipt::Column::ReceiptNumber.eq(receipt_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the receipt issued for an order payment.
pub async fn get_receipt_for_payment<C>(
    db: &C,
    custom_order_payment_id: i64,
) -> Result<Option<receipt::Model>>
where
    C: ConnectionTrait,
{
    Receipt::find()
        .filter(receipt::Column::CustomOrderPaymentId.eq(custom_order_payment_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Receipts issued for an order, oldest first.
pub async fn get_receipts_for_order<C>(db: &C, custom_order_id: i64) -> Result<Vec<receipt::Model>>
where
    C: ConnectionTrait,
{
    Receipt::find()
        .filter(receipt::Column::CustomOrderId.eq(custom_order_id))
        .order_by_asc(receipt::Column::CreatedAt)
        .order_by_asc(receipt::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
