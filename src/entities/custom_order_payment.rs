//! Custom order payment entity - money received against a custom order.
//!
//! The row is created when staff record a payment and gains an
//! `invoice_payment_id` back-reference once it has been synchronized into the
//! order's invoice. The `method` column is free-form text: older rows may carry
//! values outside [`OrderPaymentMethod`], so it is parsed leniently on read and
//! strictly on write.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Order payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_order_payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order the money was received for
    pub custom_order_id: i64,
    /// Amount received
    pub amount: i64,
    /// Method as recorded by staff (see [`OrderPaymentMethod`])
    pub method: Option<String>,
    /// When the money was received
    pub paid_at: DateTimeUtc,
    /// Free-form notes
    pub notes: Option<String>,
    /// Staff member who recorded the payment
    pub recorded_by: Option<i64>,
    /// Linked invoice payment, set once synchronized
    #[sea_orm(unique)]
    pub invoice_payment_id: Option<i64>,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `CustomOrderPayment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one order
    #[sea_orm(
        belongs_to = "super::custom_order::Entity",
        from = "Column::CustomOrderId",
        to = "super::custom_order::Column::Id",
        on_delete = "Cascade"
    )]
    CustomOrder,
    /// The invoice-side mirror of this payment
    #[sea_orm(
        belongs_to = "super::invoice_payment::Entity",
        from = "Column::InvoicePaymentId",
        to = "super::invoice_payment::Column::Id",
        on_delete = "SetNull"
    )]
    InvoicePayment,
}

impl Related<super::custom_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomOrder.def()
    }
}

impl Related<super::invoice_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoicePayment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Payment methods accepted when staff record a payment on an order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPaymentMethod {
    /// Cash at the counter
    Cash,
    /// Wave mobile wallet
    Wave,
    /// Orange Money mobile wallet
    OrangeMoney,
    /// MTN Mobile Money wallet
    MtnMobileMoney,
    /// Bank transfer
    BankTransfer,
    /// Cheque
    Check,
    /// Card terminal
    Card,
    /// Anything else
    Other,
}

impl OrderPaymentMethod {
    /// Every accepted method, in display order.
    pub const ALL: [Self; 8] = [
        Self::Cash,
        Self::Wave,
        Self::OrangeMoney,
        Self::MtnMobileMoney,
        Self::BankTransfer,
        Self::Check,
        Self::Card,
        Self::Other,
    ];

    /// Canonical stored form, e.g. `ORANGE_MONEY`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Wave => "WAVE",
            Self::OrangeMoney => "ORANGE_MONEY",
            Self::MtnMobileMoney => "MTN_MOBILE_MONEY",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::Check => "CHECK",
            Self::Card => "CARD",
            Self::Other => "OTHER",
        }
    }

    /// Label printed on receipts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Espèces",
            Self::Wave => "Wave",
            Self::OrangeMoney => "Orange Money",
            Self::MtnMobileMoney => "MTN Mobile Money",
            Self::BankTransfer => "Virement bancaire",
            Self::Check => "Chèque",
            Self::Card => "Carte bancaire",
            Self::Other => "Autre",
        }
    }
}

impl fmt::Display for OrderPaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderPaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownPaymentMethod {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_display_is_the_stored_value() {
        assert_eq!(OrderPaymentMethod::OrangeMoney.to_string(), "ORANGE_MONEY");
        assert_eq!(format!("{}", OrderPaymentMethod::Cash), "CASH");
    }

    #[test]
    fn test_parse_accepts_every_canonical_value() {
        for method in OrderPaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<OrderPaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(
            " orange_money ".parse::<OrderPaymentMethod>().unwrap(),
            OrderPaymentMethod::OrangeMoney
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "BITCOIN".parse::<OrderPaymentMethod>().unwrap_err();
        assert!(matches!(err, Error::UnknownPaymentMethod { value } if value == "BITCOIN"));
        assert!("".parse::<OrderPaymentMethod>().is_err());
    }
}
