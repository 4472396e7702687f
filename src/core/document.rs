//! Document assembly for invoice and receipt rendering.
//!
//! The PDF generators are outside this crate; they receive fully assembled,
//! serializable documents. This module gathers the persisted rows, adds the
//! issuer details from [`BillingConfig`] and the balance still due, and
//! provides the plain-text receipt used for printing and e-mail bodies.

use crate::{
    config::billing::{BillingConfig, BusinessInfo},
    core::{
        invoice::{get_invoice_by_id, get_invoice_items, get_invoice_payments},
        receipt::get_receipt_by_id,
    },
    entities::{invoice, invoice_item, invoice_payment, receipt},
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::fmt::Write;

/// Everything needed to render an invoice.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDocument {
    /// Issuer printed in the header
    pub issuer: BusinessInfo,
    /// Currency suffix for amounts
    pub currency: String,
    pub invoice: invoice::Model,
    /// Lines in display order
    pub items: Vec<invoice_item::Model>,
    /// Payments applied so far, oldest first
    pub payments: Vec<invoice_payment::Model>,
    /// `total - amount_paid`, never negative
    pub balance_due: i64,
}

/// Everything needed to render a receipt.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptDocument {
    pub issuer: BusinessInfo,
    pub currency: String,
    pub receipt: receipt::Model,
    /// Number of the invoice the payment was applied to, if it still exists
    pub invoice_number: Option<String>,
    pub invoice_total: Option<i64>,
    /// Amount paid on the invoice at rendering time
    pub amount_paid_to_date: Option<i64>,
    pub balance_due: Option<i64>,
}

/// Loads an invoice with its lines and payments.
pub async fn load_invoice_document<C>(
    db: &C,
    config: &BillingConfig,
    invoice_id: i64,
) -> Result<InvoiceDocument>
where
    C: ConnectionTrait,
{
    let invoice = get_invoice_by_id(db, invoice_id)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;
    let items = get_invoice_items(db, invoice_id).await?;
    let payments = get_invoice_payments(db, invoice_id).await?;

    Ok(InvoiceDocument {
        issuer: config.business.clone(),
        currency: config.documents.currency.clone(),
        balance_due: balance_due(&invoice),
        invoice,
        items,
        payments,
    })
}

/// Loads a receipt together with the current state of its invoice.
pub async fn load_receipt_document<C>(
    db: &C,
    config: &BillingConfig,
    receipt_id: i64,
) -> Result<ReceiptDocument>
where
    C: ConnectionTrait,
{
    let receipt = get_receipt_by_id(db, receipt_id)
        .await?
        .ok_or(Error::ReceiptNotFound { id: receipt_id })?;
    let invoice = match receipt.invoice_id {
        Some(invoice_id) => get_invoice_by_id(db, invoice_id).await?,
        None => None,
    };

    Ok(ReceiptDocument {
        issuer: config.business.clone(),
        currency: config.documents.currency.clone(),
        invoice_number: invoice.as_ref().map(|inv| inv.invoice_number.clone()),
        invoice_total: invoice.as_ref().map(|inv| inv.total),
        amount_paid_to_date: invoice.as_ref().map(|inv| inv.amount_paid),
        balance_due: invoice.as_ref().map(balance_due),
        receipt,
    })
}

fn balance_due(invoice: &invoice::Model) -> i64 {
    (invoice.total - invoice.amount_paid).max(0)
}

/// Formats an amount with space-separated thousands and a currency suffix.
///
/// `23000` with `"FCFA"` gives `"23 000 FCFA"`.
#[must_use]
pub fn format_amount(amount: i64, currency: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} {currency}")
}

/// Renders a receipt as plain text.
#[must_use]
pub fn render_receipt_text(document: &ReceiptDocument) -> String {
    let receipt = &document.receipt;
    let currency = document.currency.as_str();
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", document.issuer.name);
    for line in [&document.issuer.address, &document.issuer.phone, &document.issuer.email]
        .into_iter()
        .flatten()
    {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "REÇU DE PAIEMENT N° {}", receipt.receipt_number);
    let _ = writeln!(out, "Date : {}", receipt.payment_date.format("%d/%m/%Y"));
    let _ = writeln!(out, "Client : {}", receipt.customer_name);
    if let Some(phone) = &receipt.customer_phone {
        let _ = writeln!(out, "Téléphone : {phone}");
    }
    if let Some(order_number) = &receipt.order_number {
        let _ = writeln!(out, "Commande : {order_number}");
    }
    if let Some(invoice_number) = &document.invoice_number {
        let _ = writeln!(out, "Facture : {invoice_number}");
    }
    let _ = writeln!(out, "Montant reçu : {}", format_amount(receipt.amount, currency));
    let _ = writeln!(out, "Mode de paiement : {}", receipt.payment_method);
    if let Some(reference) = &receipt.payment_reference {
        let _ = writeln!(out, "Référence : {reference}");
    }
    if let Some(balance) = document.balance_due {
        let _ = writeln!(out, "Reste à payer : {}", format_amount(balance, currency));
    }
    if let Some(staff) = &receipt.issued_by_name {
        let _ = writeln!(out, "Reçu par : {staff}");
    }

    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::payment::sync_payment_to_invoice;
    use crate::test_utils::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0, "FCFA"), "0 FCFA");
        assert_eq!(format_amount(999, "FCFA"), "999 FCFA");
        assert_eq!(format_amount(1_000, "FCFA"), "1 000 FCFA");
        assert_eq!(format_amount(23_000, "FCFA"), "23 000 FCFA");
        assert_eq!(format_amount(1_234_567, "XOF"), "1 234 567 XOF");
        assert_eq!(format_amount(-1_500, "FCFA"), "-1 500 FCFA");
    }

    #[tokio::test]
    async fn test_invoice_document() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_sample_order(&db, None).await?;
        let payment = insert_raw_payment(&db, order.id, 10_000, Some("CASH")).await?;
        let outcome = sync_payment_to_invoice(&db, payment.id, order.id, None).await?;

        let document = load_invoice_document(&db, &BillingConfig::default(), outcome.invoice_id).await?;
        assert_eq!(document.items.len(), 3);
        assert_eq!(document.payments.len(), 1);
        assert_eq!(document.balance_due, 13_000);
        assert_eq!(document.currency, "FCFA");
        assert_eq!(document.issuer.name, "Atelier");
        Ok(())
    }

    #[tokio::test]
    async fn test_receipt_document_and_text() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db).await?;
        let staff = create_test_staff(&db).await?;
        let order = create_sample_order(&db, Some(customer.id)).await?;
        let payment = insert_raw_payment(&db, order.id, 10_000, Some("WAVE")).await?;
        let outcome = sync_payment_to_invoice(&db, payment.id, order.id, Some(staff.id)).await?;

        let mut config = BillingConfig::default();
        config.business.name = "Atelier Ndiaye".to_string();
        config.business.phone = Some("+221 33 800 00 00".to_string());

        let document = load_receipt_document(&db, &config, outcome.receipt_id).await?;
        assert_eq!(document.invoice_total, Some(23_000));
        assert_eq!(document.amount_paid_to_date, Some(10_000));
        assert_eq!(document.balance_due, Some(13_000));

        let text = render_receipt_text(&document);
        assert!(text.starts_with("Atelier Ndiaye\n+221 33 800 00 00\n"));
        assert!(text.contains(&format!("REÇU DE PAIEMENT N° {}", document.receipt.receipt_number)));
        assert!(text.contains("Client : Awa Diop"));
        assert!(text.contains("Montant reçu : 10 000 FCFA"));
        assert!(text.contains("Mode de paiement : Wave"));
        assert!(text.contains("Reste à payer : 13 000 FCFA"));
        assert!(text.contains("Reçu par : Moussa Sarr"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_documents() -> Result<()> {
        let db = setup_test_db().await?;
        let config = BillingConfig::default();
        assert!(matches!(
            load_invoice_document(&db, &config, 1).await,
            Err(Error::InvoiceNotFound { id: 1 })
        ));
        assert!(matches!(
            load_receipt_document(&db, &config, 1).await,
            Err(Error::ReceiptNotFound { id: 1 })
        ));
        Ok(())
    }
}
