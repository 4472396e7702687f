//! Core billing logic - framework-agnostic operations over the billing tables.
//!
//! Route handlers call into these modules; nothing here knows about HTTP.

pub mod document;
pub mod invoice;
pub mod numbering;
pub mod order;
pub mod payment;
pub mod receipt;
pub mod retry;
