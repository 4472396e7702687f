//! Retry of whole units of work on uniqueness conflicts.
//!
//! Number generation reads the last number and inserts the next one, so two
//! writers numbering the same day can compute the same value. The unique
//! constraint rejects the second insert; re-running the entire transaction
//! re-reads the latest number and succeeds. The same applies to two requests
//! materializing the invoice of one order at once: on retry the second finds
//! the invoice the first created.

use crate::errors::Result;
use std::future::Future;
use tracing::warn;

/// Attempts made by billing operations before a uniqueness conflict is surfaced.
pub const NUMBER_RETRY_ATTEMPTS: u32 = 3;

/// Runs `operation` until it succeeds, fails with anything other than a
/// uniqueness violation, or `attempts` runs have been made.
///
/// `operation` must be a complete unit of work (typically one transaction) so a
/// failed attempt leaves nothing behind.
pub async fn retry_on_unique_violation<T, F, Fut>(attempts: u32, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(err) if err.is_unique_violation() && attempt < attempts => {
                warn!(attempt, "Uniqueness conflict, retrying: {err}");
                attempt += 1;
            }
            result => return result,
        }
    }
}
