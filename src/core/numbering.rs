//! Daily-scoped document numbering.
//!
//! Invoice and receipt numbers look like `FAC-170126-0001` / `REC-170126-0001`:
//! a tag, the issue day as `DDMMYY`, and a 4-digit zero-padded sequence that
//! restarts every day. The next number follows the greatest numeric sequence
//! already issued under the day prefix; rows whose suffix is not a number are
//! ignored. Deleted numbers are never reused unless they
//! were the last of their day, and nothing is reserved ahead of the insert that
//! consumes the number; concurrent writers are arbitrated by the unique
//! constraints on the number columns (see [`crate::core::retry`]).

use crate::{
    entities::{Invoice, Receipt, invoice, receipt},
    errors::{Error, Result},
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use sea_orm::{QuerySelect, prelude::*};

/// Tag of invoice numbers
pub const INVOICE_TAG: &str = "FAC";
/// Tag of receipt numbers
pub const RECEIPT_TAG: &str = "REC";

const MAX_DAILY_SEQUENCE: u32 = 9999;

/// The calendar day a document issued at `now` is numbered under (server local time).
#[must_use]
pub fn business_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

/// Builds the `"<TAG>-DDMMYY-"` prefix shared by every number of one day.
#[must_use]
pub fn day_prefix(tag: &str, date: NaiveDate) -> String {
    format!("{tag}-{}-", date.format("%d%m%y"))
}

/// Computes the number following the greatest sequence in `existing` under `prefix`.
///
/// Numbers outside `prefix` or with a non-numeric suffix are skipped; with
/// nothing left the sequence starts at `0001`.
pub fn next_in_sequence<'a, I>(prefix: &str, existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let last_sequence = existing
        .into_iter()
        .filter_map(|number| number.strip_prefix(prefix))
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    let next = last_sequence + 1;
    if next > MAX_DAILY_SEQUENCE {
        return Err(Error::SequenceExhausted {
            prefix: prefix.to_string(),
        });
    }

    Ok(format!("{prefix}{next:04}"))
}

/// Generates the next invoice number for `date`.
pub async fn next_invoice_number<C>(db: &C, date: NaiveDate) -> Result<String>
where
    C: ConnectionTrait,
{
    let prefix = day_prefix(INVOICE_TAG, date);
    let issued: Vec<String> = Invoice::find()
        .select_only()
        .column(invoice::Column::InvoiceNumber)
        .filter(invoice::Column::InvoiceNumber.starts_with(prefix.as_str()))
        .into_tuple()
        .all(db)
        .await?;

    next_in_sequence(&prefix, issued.iter().map(String::as_str))
}

/// Generates the next receipt number for `date`.
pub async fn next_receipt_number<C>(db: &C, date: NaiveDate) -> Result<String>
where
    C: ConnectionTrait,
{
    let prefix = day_prefix(RECEIPT_TAG, date);
    let issued: Vec<String> = Receipt::find()
        .select_only()
        .column(receipt::Column::ReceiptNumber)
        .filter(receipt::Column::ReceiptNumber.starts_with(prefix.as_str()))
        .into_tuple()
        .all(db)
        .await?;

    next_in_sequence(&prefix, issued.iter().map(String::as_str))
}
