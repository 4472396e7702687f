//! Shared test utilities.
//!
//! This module provides helper functions for setting up test databases and
//! creating customers, staff, orders and raw payments with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::order::{NewCustomOrder, NewOrderItem, create_custom_order},
    entities::{custom_order, custom_order_payment, customer, staff},
    errors::Result,
};
use chrono::{TimeZone, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a customer living in Dakar.
pub async fn create_test_customer(db: &DatabaseConnection) -> Result<customer::Model> {
    customer::ActiveModel {
        name: Set(Some("Awa Diop".to_string())),
        phone: Set(Some("+221 77 123 45 67".to_string())),
        email: Set(Some("awa.diop@example.com".to_string())),
        city: Set(Some("Dakar".to_string())),
        country: Set(Some("Sénégal".to_string())),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a staff member.
pub async fn create_test_staff(db: &DatabaseConnection) -> Result<staff::Model> {
    staff::ActiveModel {
        name: Set("Moussa Sarr".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Order input with two garment lines (10 000 x 1 and 5 000 x 2) and a
/// material cost of 3 000, for a total of 23 000.
#[must_use]
pub fn sample_order_input(order_number: &str, customer_id: Option<i64>) -> NewCustomOrder {
    NewCustomOrder {
        order_number: order_number.to_string(),
        customer_id,
        order_date: Utc.with_ymd_and_hms(2026, 1, 17, 9, 30, 0).unwrap(),
        pickup_date: Some(Utc.with_ymd_and_hms(2026, 2, 14, 17, 0, 0).unwrap()),
        material_cost: 3_000,
        notes: None,
        items: vec![
            NewOrderItem {
                garment_type: "Boubou".to_string(),
                description: None,
                quantity: 1,
                unit_price: 10_000,
            },
            NewOrderItem {
                garment_type: "Pantalon".to_string(),
                description: Some("coupe droite".to_string()),
                quantity: 2,
                unit_price: 5_000,
            },
        ],
    }
}

/// Creates the sample order described by [`sample_order_input`].
pub async fn create_sample_order(
    db: &DatabaseConnection,
    customer_id: Option<i64>,
) -> Result<custom_order::Model> {
    create_custom_order(db, sample_order_input("CMD-0001", customer_id)).await
}

/// Creates an order with no garment lines and no material cost.
pub async fn create_custom_order_with_number(
    db: &DatabaseConnection,
    order_number: &str,
) -> Result<custom_order::Model> {
    let mut input = sample_order_input(order_number, None);
    input.items.clear();
    input.material_cost = 0;
    create_custom_order(db, input).await
}

/// Inserts an order payment without synchronizing it.
///
/// `method` is stored verbatim so legacy values can be exercised.
pub async fn insert_raw_payment(
    db: &DatabaseConnection,
    custom_order_id: i64,
    amount: i64,
    method: Option<&str>,
) -> Result<custom_order_payment::Model> {
    let now = Utc::now();
    custom_order_payment::ActiveModel {
        custom_order_id: Set(custom_order_id),
        amount: Set(amount),
        method: Set(method.map(str::to_string)),
        paid_at: Set(now),
        notes: Set(None),
        recorded_by: Set(None),
        invoice_payment_id: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
