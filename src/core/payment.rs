//! Payment synchronization between custom orders and their invoices.
//!
//! A payment recorded on an order is mirrored onto the order's invoice (created
//! on first use), linked back to its invoice payment, proven by a receipt, and
//! finally reflected in the invoice's amount paid and status. Each public
//! operation runs as a single transaction: a failure at any step leaves no
//! invoice payment, receipt or link behind.

use crate::{
    core::{
        invoice::{ensure_invoice, update_invoice_amount_and_status},
        receipt::{ReceiptContext, emit_receipt, get_receipt_for_payment},
        retry::{NUMBER_RETRY_ATTEMPTS, retry_on_unique_violation},
    },
    entities::{
        CustomOrder, CustomOrderPayment, Customer, Invoice, InvoicePayment, InvoicePaymentMethod,
        OrderPaymentMethod, Receipt, custom_order_payment, invoice, invoice_payment, receipt,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Condition, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Ids produced (or found) by a synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub invoice_id: i64,
    pub invoice_payment_id: i64,
    pub receipt_id: i64,
}

/// Input for [`record_payment`].
#[derive(Debug, Clone)]
pub struct NewOrderPayment {
    pub custom_order_id: i64,
    /// Amount received; must be positive
    pub amount: i64,
    /// Parsed at the boundary with [`OrderPaymentMethod::from_str`](std::str::FromStr)
    pub method: OrderPaymentMethod,
    /// Defaults to now
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A newly recorded payment and the documents derived from it.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The order payment, already linked to its invoice payment
    pub payment: custom_order_payment::Model,
    pub outcome: SyncOutcome,
}

/// Maps a stored order payment method onto the invoice payment methods.
///
/// Missing or unrecognized values map to cash; new payments cannot carry such
/// values because [`record_payment`] only accepts [`OrderPaymentMethod`].
#[must_use]
pub fn map_payment_method(source: Option<&str>) -> InvoicePaymentMethod {
    source
        .and_then(|method| method.parse::<OrderPaymentMethod>().ok())
        .map_or(InvoicePaymentMethod::Cash, InvoicePaymentMethod::from)
}

/// Short reference printed for a payment: the last 8 characters of its zero-padded id.
#[must_use]
pub fn short_reference(payment_id: i64) -> String {
    let padded = format!("{payment_id:08}");
    padded[padded.len() - 8..].to_string()
}

/// Records a payment on a custom order and synchronizes it in the same transaction.
#[instrument(skip(db, input), fields(custom_order_id = input.custom_order_id, amount = input.amount))]
pub async fn record_payment(
    db: &DatabaseConnection,
    input: NewOrderPayment,
    actor_id: Option<i64>,
) -> Result<RecordedPayment> {
    if input.amount <= 0 {
        return Err(Error::InvalidAmount {
            amount: input.amount,
        });
    }

    retry_on_unique_violation(NUMBER_RETRY_ATTEMPTS, move || {
        record_in_transaction(db, input.clone(), actor_id)
    })
    .await
}

async fn record_in_transaction(
    db: &DatabaseConnection,
    input: NewOrderPayment,
    actor_id: Option<i64>,
) -> Result<RecordedPayment> {
    let txn = db.begin().await?;
    let now = Utc::now();

    CustomOrder::find_by_id(input.custom_order_id)
        .one(&txn)
        .await?
        .ok_or(Error::CustomOrderNotFound {
            id: input.custom_order_id,
        })?;

    let payment = custom_order_payment::ActiveModel {
        custom_order_id: Set(input.custom_order_id),
        amount: Set(input.amount),
        method: Set(Some(input.method.as_str().to_string())),
        paid_at: Set(input.paid_at.unwrap_or(now)),
        notes: Set(input.notes),
        recorded_by: Set(actor_id),
        invoice_payment_id: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    debug!(payment_id = payment.id, method = %input.method, "Order payment recorded");

    let outcome = sync_payment(&txn, payment.id, input.custom_order_id, actor_id, now).await?;
    let payment = CustomOrderPayment::find_by_id(payment.id)
        .one(&txn)
        .await?
        .ok_or(Error::PaymentNotFound { id: payment.id })?;

    txn.commit().await?;
    Ok(RecordedPayment { payment, outcome })
}

/// Mirrors an order payment onto the order's invoice and issues its receipt.
///
/// Creates the invoice if the order has none yet. A payment that is already
/// linked to an invoice payment returns its existing ids instead of creating
/// new rows.
#[instrument(skip(db))]
pub async fn sync_payment_to_invoice(
    db: &DatabaseConnection,
    custom_order_payment_id: i64,
    custom_order_id: i64,
    actor_id: Option<i64>,
) -> Result<SyncOutcome> {
    retry_on_unique_violation(NUMBER_RETRY_ATTEMPTS, move || {
        sync_in_transaction(db, custom_order_payment_id, custom_order_id, actor_id)
    })
    .await
}

async fn sync_in_transaction(
    db: &DatabaseConnection,
    custom_order_payment_id: i64,
    custom_order_id: i64,
    actor_id: Option<i64>,
) -> Result<SyncOutcome> {
    let txn = db.begin().await?;
    let outcome = sync_payment(
        &txn,
        custom_order_payment_id,
        custom_order_id,
        actor_id,
        Utc::now(),
    )
    .await?;
    txn.commit().await?;
    Ok(outcome)
}

async fn sync_payment<C>(
    db: &C,
    custom_order_payment_id: i64,
    custom_order_id: i64,
    actor_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<SyncOutcome>
where
    C: ConnectionTrait,
{
    let payment = CustomOrderPayment::find_by_id(custom_order_payment_id)
        .filter(custom_order_payment::Column::CustomOrderId.eq(custom_order_id))
        .one(db)
        .await?
        .ok_or(Error::PaymentNotFound {
            id: custom_order_payment_id,
        })?;
    let order = CustomOrder::find_by_id(custom_order_id)
        .one(db)
        .await?
        .ok_or(Error::CustomOrderNotFound {
            id: custom_order_id,
        })?;
    let customer = match order.customer_id {
        Some(customer_id) => Customer::find_by_id(customer_id).one(db).await?,
        None => None,
    };

    let already_linked = match payment.invoice_payment_id {
        Some(invoice_payment_id) => InvoicePayment::find_by_id(invoice_payment_id).one(db).await?,
        None => None,
    };
    if let Some(invoice_payment) = already_linked {
        let receipt = match get_receipt_for_payment(db, payment.id).await? {
            Some(receipt) => receipt,
            None => {
                let context = ReceiptContext {
                    order: &order,
                    customer: customer.as_ref(),
                    payment: &payment,
                    invoice_payment: &invoice_payment,
                    actor_id,
                };
                emit_receipt(db, context, now).await?
            }
        };
        update_invoice_amount_and_status(db, invoice_payment.invoice_id).await?;
        debug!(invoice_payment_id = invoice_payment.id, "Payment already synchronized");
        return Ok(SyncOutcome {
            invoice_id: invoice_payment.invoice_id,
            invoice_payment_id: invoice_payment.id,
            receipt_id: receipt.id,
        });
    }

    let invoice_id = ensure_invoice(db, custom_order_id, actor_id, now).await?;

    let invoice_payment = invoice_payment::ActiveModel {
        invoice_id: Set(invoice_id),
        amount: Set(payment.amount),
        method: Set(map_payment_method(payment.method.as_deref())),
        reference: Set(Some(short_reference(payment.id))),
        paid_at: Set(payment.paid_at),
        notes: Set(payment.notes.clone()),
        created_by: Set(actor_id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut linked: custom_order_payment::ActiveModel = payment.into();
    linked.invoice_payment_id = Set(Some(invoice_payment.id));
    let payment = linked.update(db).await?;

    let context = ReceiptContext {
        order: &order,
        customer: customer.as_ref(),
        payment: &payment,
        invoice_payment: &invoice_payment,
        actor_id,
    };
    let receipt = emit_receipt(db, context, now).await?;

    let invoice = update_invoice_amount_and_status(db, invoice_id).await?;

    info!(
        invoice_id,
        invoice_payment_id = invoice_payment.id,
        receipt_number = %receipt.receipt_number,
        status = ?invoice.status,
        "Payment synchronized to invoice"
    );
    Ok(SyncOutcome {
        invoice_id,
        invoice_payment_id: invoice_payment.id,
        receipt_id: receipt.id,
    })
}

/// Deletes an order payment together with its receipt and invoice payment,
/// then recomputes the invoice.
///
/// A payment that no longer exists is not an error.
#[instrument(skip(db))]
pub async fn delete_payment_and_sync(
    db: &DatabaseConnection,
    custom_order_payment_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    let Some(payment) = CustomOrderPayment::find_by_id(custom_order_payment_id)
        .one(&txn)
        .await?
    else {
        debug!("Payment already deleted");
        return Ok(());
    };

    let invoice = Invoice::find()
        .filter(invoice::Column::CustomOrderId.eq(payment.custom_order_id))
        .one(&txn)
        .await?;

    let mut receipt_filter =
        Condition::any().add(receipt::Column::CustomOrderPaymentId.eq(payment.id));
    if let Some(invoice_payment_id) = payment.invoice_payment_id {
        receipt_filter = receipt_filter.add(receipt::Column::InvoicePaymentId.eq(invoice_payment_id));
    }
    let receipts_removed = Receipt::delete_many()
        .filter(receipt_filter)
        .exec(&txn)
        .await?
        .rows_affected;

    if let Some(invoice_payment_id) = payment.invoice_payment_id {
        InvoicePayment::delete_by_id(invoice_payment_id)
            .exec(&txn)
            .await?;
    }

    payment.delete(&txn).await?;

    if let Some(invoice) = invoice {
        update_invoice_amount_and_status(&txn, invoice.id).await?;
    }

    txn.commit().await?;
    info!(receipts_removed, "Payment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::invoice::{get_invoice_by_id, get_invoice_for_order, get_invoice_payments};
    use crate::core::numbering::{RECEIPT_TAG, business_date, day_prefix};
    use crate::core::receipt::{get_receipt_by_id, get_receipts_for_order};
    use crate::entities::InvoiceStatus;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, PaginatorTrait};

    async fn assert_amount_paid_matches_payments(
        db: &DatabaseConnection,
        invoice_id: i64,
    ) -> Result<()> {
        let invoice = get_invoice_by_id(db, invoice_id).await?.unwrap();
        let sum: i64 = get_invoice_payments(db, invoice_id)
            .await?
            .iter()
            .map(|payment| payment.amount)
            .sum();
        assert_eq!(invoice.amount_paid, sum);
        assert_eq!(
            invoice.status,
            crate::core::invoice::invoice_status_for(sum, invoice.total)
        );
        assert_eq!(invoice.paid_date.is_some(), invoice.status == InvoiceStatus::Paid);
        Ok(())
    }

    #[test]
    fn test_short_reference() {
        assert_eq!(short_reference(42), "00000042");
        assert_eq!(short_reference(12_345_678), "12345678");
        assert_eq!(short_reference(123_456_789_012), "56789012");
    }

    #[test]
    fn test_map_payment_method() {
        assert_eq!(map_payment_method(Some("CASH")), InvoicePaymentMethod::Cash);
        assert_eq!(map_payment_method(Some("WAVE")), InvoicePaymentMethod::MobileMoney);
        assert_eq!(
            map_payment_method(Some("ORANGE_MONEY")),
            InvoicePaymentMethod::MobileMoney
        );
        assert_eq!(
            map_payment_method(Some("MTN_MOBILE_MONEY")),
            InvoicePaymentMethod::MobileMoney
        );
        assert_eq!(
            map_payment_method(Some("BANK_TRANSFER")),
            InvoicePaymentMethod::BankTransfer
        );
        assert_eq!(map_payment_method(Some("CHECK")), InvoicePaymentMethod::Check);
        assert_eq!(map_payment_method(Some("CARD")), InvoicePaymentMethod::Card);
        assert_eq!(map_payment_method(Some("OTHER")), InvoicePaymentMethod::Other);
        assert_eq!(map_payment_method(None), InvoicePaymentMethod::Cash);
        assert_eq!(map_payment_method(Some("BITCOIN")), InvoicePaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_payment_lifecycle_scenario() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db).await?;
        let staff = create_test_staff(&db).await?;
        let order = create_sample_order(&db, Some(customer.id)).await?;

        // First payment: partial
        let first = insert_raw_payment(&db, order.id, 10_000, Some("WAVE")).await?;
        let outcome = sync_payment_to_invoice(&db, first.id, order.id, Some(staff.id)).await?;
        let invoice = get_invoice_by_id(&db, outcome.invoice_id).await?.unwrap();
        assert_eq!(invoice.total, 23_000);
        assert_eq!(invoice.amount_paid, 10_000);
        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert!(invoice.paid_date.is_none());

        let invoice_payment = InvoicePayment::find_by_id(outcome.invoice_payment_id)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(invoice_payment.amount, 10_000);
        assert_eq!(invoice_payment.method, InvoicePaymentMethod::MobileMoney);
        assert_eq!(invoice_payment.reference, Some(short_reference(first.id)));
        assert_eq!(invoice_payment.created_by, Some(staff.id));

        let linked = CustomOrderPayment::find_by_id(first.id).one(&db).await?.unwrap();
        assert_eq!(linked.invoice_payment_id, Some(outcome.invoice_payment_id));

        let receipt = get_receipt_by_id(&db, outcome.receipt_id).await?.unwrap();
        let prefix = day_prefix(RECEIPT_TAG, business_date(receipt.created_at));
        assert_eq!(receipt.receipt_number, format!("{prefix}0001"));
        assert_eq!(receipt.customer_name, "Awa Diop");
        assert_eq!(receipt.customer_phone.as_deref(), Some("+221 77 123 45 67"));
        assert_eq!(receipt.issued_by_name.as_deref(), Some("Moussa Sarr"));
        assert_eq!(receipt.payment_method, "Wave");
        assert_eq!(receipt.amount, 10_000);
        assert_eq!(receipt.custom_order_payment_id, Some(first.id));
        assert_eq!(receipt.invoice_payment_id, Some(outcome.invoice_payment_id));
        assert_eq!(receipt.order_number.as_deref(), Some(order.order_number.as_str()));

        // Second payment settles the invoice
        let second = insert_raw_payment(&db, order.id, 13_000, Some("CASH")).await?;
        let second_outcome =
            sync_payment_to_invoice(&db, second.id, order.id, Some(staff.id)).await?;
        assert_eq!(second_outcome.invoice_id, outcome.invoice_id);
        let invoice = get_invoice_by_id(&db, outcome.invoice_id).await?.unwrap();
        assert_eq!(invoice.amount_paid, 23_000);
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(invoice.paid_date.is_some());

        let second_receipt = get_receipt_by_id(&db, second_outcome.receipt_id).await?.unwrap();
        assert_eq!(second_receipt.receipt_number, format!("{prefix}0002"));

        // Deleting the second payment reverts to partial
        delete_payment_and_sync(&db, second.id).await?;
        let invoice = get_invoice_by_id(&db, outcome.invoice_id).await?.unwrap();
        assert_eq!(invoice.amount_paid, 10_000);
        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert!(invoice.paid_date.is_none());

        assert!(get_receipt_by_id(&db, second_outcome.receipt_id).await?.is_none());
        assert!(
            InvoicePayment::find_by_id(second_outcome.invoice_payment_id)
                .one(&db)
                .await?
                .is_none()
        );
        assert!(CustomOrderPayment::find_by_id(second.id).one(&db).await?.is_none());
        assert!(get_receipt_by_id(&db, outcome.receipt_id).await?.is_some());
        assert!(CustomOrder::find_by_id(order.id).one(&db).await?.is_some());
        assert_eq!(get_receipts_for_order(&db, order.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_sync_materializes_invoice_lazily() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;
        assert!(get_invoice_for_order(&db, order.id).await?.is_none());

        let payment = insert_raw_payment(&db, order.id, 5_000, Some("CARD")).await?;
        let outcome = sync_payment_to_invoice(&db, payment.id, order.id, None).await?;

        let invoice = get_invoice_for_order(&db, order.id).await?.unwrap();
        assert_eq!(invoice.id, outcome.invoice_id);
        assert_eq!(invoice.amount_paid, 5_000);

        let receipt = get_receipt_by_id(&db, outcome.receipt_id).await?.unwrap();
        assert_eq!(receipt.customer_name, "Client");
        assert!(receipt.issued_by_name.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_sync_is_idempotent_per_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;
        let payment = insert_raw_payment(&db, order.id, 8_000, None).await?;

        let first = sync_payment_to_invoice(&db, payment.id, order.id, None).await?;
        let second = sync_payment_to_invoice(&db, payment.id, order.id, None).await?;

        assert_eq!(first, second);
        assert_eq!(InvoicePayment::find().count(&db).await?, 1);
        assert_eq!(Receipt::find().count(&db).await?, 1);
        let invoice = get_invoice_by_id(&db, first.invoice_id).await?.unwrap();
        assert_eq!(invoice.amount_paid, 8_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_methods_default_to_cash() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;

        for method in [None, Some("BITCOIN")] {
            let payment = insert_raw_payment(&db, order.id, 1_000, method).await?;
            let outcome = sync_payment_to_invoice(&db, payment.id, order.id, None).await?;
            let invoice_payment = InvoicePayment::find_by_id(outcome.invoice_payment_id)
                .one(&db)
                .await?
                .unwrap();
            assert_eq!(invoice_payment.method, InvoicePaymentMethod::Cash);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_sync_missing_payment_has_no_side_effects() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;

        let result = sync_payment_to_invoice(&db, 999, order.id, None).await;
        assert!(matches!(result, Err(Error::PaymentNotFound { id: 999 })));
        assert!(get_invoice_for_order(&db, order.id).await?.is_none());
        assert_eq!(Receipt::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_sync_payment_of_another_order_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;
        let other = create_custom_order_with_number(&db, "CMD-OTHER").await?;
        let payment = insert_raw_payment(&db, order.id, 1_000, None).await?;

        let result = sync_payment_to_invoice(&db, payment.id, other.id, None).await;
        assert!(matches!(result, Err(Error::PaymentNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_sync_missing_payment_mock() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<custom_order_payment::Model>::new()])
            .into_connection();

        let result = sync_payment_to_invoice(&db, 1, 1, None).await;
        assert!(matches!(result, Err(Error::PaymentNotFound { id: 1 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_sync_rolls_back_every_step() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;
        let payment = insert_raw_payment(&db, order.id, 4_000, Some("WAVE")).await?;

        // A stray receipt already claims this payment, so issuing a new one fails.
        let now = Utc::now();
        receipt::ActiveModel {
            receipt_number: Set("REC-STRAY-0001".to_string()),
            custom_order_payment_id: Set(Some(payment.id)),
            customer_name: Set("Client".to_string()),
            amount: Set(4_000),
            payment_method: Set("Wave".to_string()),
            payment_date: Set(now),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let result = sync_payment_to_invoice(&db, payment.id, order.id, None).await;
        assert!(result.unwrap_err().is_unique_violation());

        assert!(get_invoice_for_order(&db, order.id).await?.is_none());
        assert_eq!(InvoicePayment::find().count(&db).await?, 0);
        let unlinked = CustomOrderPayment::find_by_id(payment.id).one(&db).await?.unwrap();
        assert!(unlinked.invoice_payment_id.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_amount_paid_tracks_payments_through_syncs_and_deletes() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;

        let mut payments = Vec::new();
        let mut invoice_id = 0;
        for amount in [2_000, 7_500, 500, 13_000] {
            let payment = insert_raw_payment(&db, order.id, amount, Some("CASH")).await?;
            invoice_id = sync_payment_to_invoice(&db, payment.id, order.id, None)
                .await?
                .invoice_id;
            assert_amount_paid_matches_payments(&db, invoice_id).await?;
            payments.push(payment);
        }
        assert_eq!(
            get_invoice_by_id(&db, invoice_id).await?.unwrap().status,
            InvoiceStatus::Paid
        );

        for payment in [&payments[1], &payments[3], &payments[0]] {
            delete_payment_and_sync(&db, payment.id).await?;
            assert_amount_paid_matches_payments(&db, invoice_id).await?;
        }

        let invoice = get_invoice_by_id(&db, invoice_id).await?.unwrap();
        assert_eq!(invoice.amount_paid, 500);
        assert_eq!(invoice.status, InvoiceStatus::Partial);

        delete_payment_and_sync(&db, payments[2].id).await?;
        let invoice = get_invoice_by_id(&db, invoice_id).await?.unwrap();
        assert_eq!(invoice.amount_paid, 0);
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_payment_is_noop() -> Result<()> {
        let db = setup_test_db().await?;
        delete_payment_and_sync(&db, 12_345).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unsynchronized_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;
        let payment = insert_raw_payment(&db, order.id, 3_000, None).await?;

        delete_payment_and_sync(&db, payment.id).await?;
        assert!(CustomOrderPayment::find_by_id(payment.id).one(&db).await?.is_none());
        assert!(get_invoice_for_order(&db, order.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_record_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let staff = create_test_staff(&db).await?;
        let order = create_sample_order(&db, None).await?;

        let recorded = record_payment(
            &db,
            NewOrderPayment {
                custom_order_id: order.id,
                amount: 23_000,
                method: "orange_money".parse()?,
                paid_at: None,
                notes: Some("Solde".to_string()),
            },
            Some(staff.id),
        )
        .await?;

        assert_eq!(recorded.payment.method.as_deref(), Some("ORANGE_MONEY"));
        assert_eq!(recorded.payment.recorded_by, Some(staff.id));
        assert_eq!(
            recorded.payment.invoice_payment_id,
            Some(recorded.outcome.invoice_payment_id)
        );
        let invoice = get_invoice_by_id(&db, recorded.outcome.invoice_id).await?.unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);

        let receipt = get_receipt_by_id(&db, recorded.outcome.receipt_id).await?.unwrap();
        assert_eq!(receipt.payment_method, "Orange Money");
        Ok(())
    }

    #[tokio::test]
    async fn test_record_payment_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;

        for amount in [0, -500] {
            let result = record_payment(
                &db,
                NewOrderPayment {
                    custom_order_id: order.id,
                    amount,
                    method: OrderPaymentMethod::Cash,
                    paid_at: None,
                    notes: None,
                },
                None,
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        let result = record_payment(
            &db,
            NewOrderPayment {
                custom_order_id: 777,
                amount: 1_000,
                method: OrderPaymentMethod::Cash,
                paid_at: None,
                notes: None,
            },
            None,
        )
        .await;
        assert!(matches!(result, Err(Error::CustomOrderNotFound { id: 777 })));
        assert_eq!(CustomOrderPayment::find().count(&db).await?, 0);
        Ok(())
    }
}
