//! Invoice business logic.
//!
//! Derives the invoice of a custom order (at most one per order) and keeps its
//! `amount_paid` / `status` consistent with the payments applied to it. The
//! amount paid is always recomputed from the full set of invoice payments
//! rather than adjusted by deltas, so redundant or concurrent recomputations
//! converge on the committed payment rows.

use crate::{
    core::{
        numbering::{business_date, next_invoice_number},
        order::CustomerSnapshot,
        retry::{NUMBER_RETRY_ATTEMPTS, retry_on_unique_violation},
    },
    entities::{
        CustomOrder, Customer, Invoice, InvoiceItem, InvoicePayment, InvoiceStatus, custom_order,
        custom_order_item, invoice, invoice_item, invoice_payment,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Description of the material-cost line.
pub const MATERIAL_LINE_LABEL: &str = "Matériaux et fournitures";

/// One line of an invoice before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total: i64,
}

/// Status implied by `amount_paid` against `total`.
///
/// Nothing paid is `Sent`, anything short of the total is `Partial`, and
/// reaching or exceeding the total is `Paid`.
#[must_use]
pub const fn invoice_status_for(amount_paid: i64, total: i64) -> InvoiceStatus {
    if amount_paid <= 0 {
        InvoiceStatus::Sent
    } else if amount_paid < total {
        InvoiceStatus::Partial
    } else {
        InvoiceStatus::Paid
    }
}

/// Mirrors the garment lines of an order, plus a material line when the order has a material cost.
#[must_use]
pub fn invoice_lines(
    order: &custom_order::Model,
    items: &[custom_order_item::Model],
) -> Vec<InvoiceLine> {
    let mut lines: Vec<InvoiceLine> = items
        .iter()
        .map(|item| {
            let description = match item.description.as_deref().map(str::trim) {
                Some(details) if !details.is_empty() => {
                    format!("{} - {details}", item.garment_type)
                }
                _ => item.garment_type.clone(),
            };
            InvoiceLine {
                description,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: item.unit_price * i64::from(item.quantity),
            }
        })
        .collect();

    if order.material_cost > 0 {
        lines.push(InvoiceLine {
            description: MATERIAL_LINE_LABEL.to_string(),
            quantity: 1,
            unit_price: order.material_cost,
            total: order.material_cost,
        });
    }

    lines
}

/// Returns the invoice of a custom order, creating it on first call.
///
/// Calling this again for the same order returns the same invoice id and
/// creates nothing. The invoice and its lines are written in one transaction,
/// retried when a concurrent writer took the same invoice number.
#[instrument(skip(db))]
pub async fn create_invoice_from_custom_order(
    db: &DatabaseConnection,
    custom_order_id: i64,
    actor_id: Option<i64>,
) -> Result<i64> {
    retry_on_unique_violation(NUMBER_RETRY_ATTEMPTS, move || {
        materialize_in_transaction(db, custom_order_id, actor_id)
    })
    .await
}

async fn materialize_in_transaction(
    db: &DatabaseConnection,
    custom_order_id: i64,
    actor_id: Option<i64>,
) -> Result<i64> {
    let txn = db.begin().await?;
    let invoice_id = ensure_invoice(&txn, custom_order_id, actor_id, Utc::now()).await?;
    txn.commit().await?;
    Ok(invoice_id)
}

/// Finds or materializes the invoice of `custom_order_id` on an existing connection or transaction.
pub(crate) async fn ensure_invoice<C>(
    db: &C,
    custom_order_id: i64,
    actor_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<i64>
where
    C: ConnectionTrait,
{
    let order = CustomOrder::find_by_id(custom_order_id)
        .one(db)
        .await?
        .ok_or(Error::CustomOrderNotFound {
            id: custom_order_id,
        })?;

    if let Some(existing) = get_invoice_for_order(db, custom_order_id).await? {
        debug!(invoice_id = existing.id, "Invoice already exists for order");
        return Ok(existing.id);
    }

    let customer = match order.customer_id {
        Some(customer_id) => Customer::find_by_id(customer_id).one(db).await?,
        None => None,
    };
    let snapshot = CustomerSnapshot::of(customer.as_ref());
    let items = crate::core::order::get_order_items(db, custom_order_id).await?;

    let subtotal: i64 = items
        .iter()
        .map(|item| item.unit_price * i64::from(item.quantity))
        .sum();
    let total = subtotal + order.material_cost;
    let invoice_number = next_invoice_number(db, business_date(now)).await?;

    let invoice = invoice::ActiveModel {
        invoice_number: Set(invoice_number),
        custom_order_id: Set(Some(order.id)),
        customer_id: Set(order.customer_id),
        customer_name: Set(snapshot.name),
        customer_phone: Set(snapshot.phone),
        customer_email: Set(snapshot.email),
        customer_address: Set(snapshot.address),
        issue_date: Set(now),
        due_date: Set(order.pickup_date),
        subtotal: Set(subtotal),
        tax_amount: Set(0),
        shipping_amount: Set(0),
        discount_amount: Set(0),
        total: Set(total),
        amount_paid: Set(0),
        status: Set(InvoiceStatus::Sent),
        paid_date: Set(None),
        notes: Set(None),
        created_by: Set(actor_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (position, line) in (0_i32..).zip(invoice_lines(&order, &items)) {
        invoice_item::ActiveModel {
            invoice_id: Set(invoice.id),
            description: Set(line.description),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            total: Set(line.total),
            position: Set(position),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        total,
        "Invoice materialized from custom order"
    );
    Ok(invoice.id)
}

/// Recomputes `amount_paid`, `status` and `paid_date` of an invoice from its payments.
///
/// Safe to call any number of times. `paid_date` is stamped when the invoice
/// becomes `Paid`, kept while it stays `Paid`, and cleared otherwise.
#[instrument(skip(db))]
pub async fn update_invoice_amount_and_status<C>(db: &C, invoice_id: i64) -> Result<invoice::Model>
where
    C: ConnectionTrait,
{
    let invoice = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let amount_paid: i64 = get_invoice_payments(db, invoice_id)
        .await?
        .iter()
        .map(|payment| payment.amount)
        .sum();
    let status = invoice_status_for(amount_paid, invoice.total);
    let now = Utc::now();
    let paid_date = match (status, invoice.status, invoice.paid_date) {
        (InvoiceStatus::Paid, InvoiceStatus::Paid, Some(settled)) => Some(settled),
        (InvoiceStatus::Paid, _, _) => Some(now),
        _ => None,
    };

    let mut active_model: invoice::ActiveModel = invoice.into();
    active_model.amount_paid = Set(amount_paid);
    active_model.status = Set(status);
    active_model.paid_date = Set(paid_date);
    active_model.updated_at = Set(now);
    let updated = active_model.update(db).await?;

    debug!(amount_paid, ?status, "Invoice status recomputed");
    Ok(updated)
}

/// Recomputes every invoice; returns how many were processed.
///
/// Used to repair invoices whose stored totals drifted from their payments.
#[instrument(skip(db))]
pub async fn reconcile_all_invoices(db: &DatabaseConnection) -> Result<usize> {
    let invoice_ids: Vec<i64> = Invoice::find()
        .select_only()
        .column(invoice::Column::Id)
        .order_by_asc(invoice::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    for invoice_id in &invoice_ids {
        update_invoice_amount_and_status(db, *invoice_id).await?;
    }

    info!(count = invoice_ids.len(), "Invoices reconciled");
    Ok(invoice_ids.len())
}

/// Finds an invoice by id.
pub async fn get_invoice_by_id<C>(db: &C, invoice_id: i64) -> Result<Option<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find_by_id(invoice_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the invoice derived from a custom order, if any.
pub async fn get_invoice_for_order<C>(db: &C, custom_order_id: i64) -> Result<Option<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find()
        .filter(invoice::Column::CustomOrderId.eq(custom_order_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lines of an invoice in display order.
pub async fn get_invoice_items<C>(db: &C, invoice_id: i64) -> Result<Vec<invoice_item::Model>>
where
    C: ConnectionTrait,
{
    InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(invoice_item::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Payments applied to an invoice, oldest first.
pub async fn get_invoice_payments<C>(db: &C, invoice_id: i64) -> Result<Vec<invoice_payment::Model>>
where
    C: ConnectionTrait,
{
    InvoicePayment::find()
        .filter(invoice_payment::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(invoice_payment::Column::PaidAt)
        .order_by_asc(invoice_payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
