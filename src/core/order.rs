//! Custom order business logic.
//!
//! Orders are created by the atelier front-office; billing only needs to read
//! them, plus a way to create them with their garment lines in one go.

use crate::{
    entities::{
        CustomOrder, CustomOrderItem, CustomOrderPayment, custom_order, custom_order_item,
        custom_order_payment, customer,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Label used when an order has no customer or the customer has no name.
pub const DEFAULT_CUSTOMER_LABEL: &str = "Client";

/// Input for [`create_custom_order`].
#[derive(Debug, Clone)]
pub struct NewCustomOrder {
    /// Human-facing order number, unique
    pub order_number: String,
    pub customer_id: Option<i64>,
    pub order_date: DateTime<Utc>,
    pub pickup_date: Option<DateTime<Utc>>,
    /// Fabric and supplies; zero when the customer brings their own
    pub material_cost: i64,
    pub notes: Option<String>,
    /// Garment lines, in display order
    pub items: Vec<NewOrderItem>,
}

/// One garment line of a [`NewCustomOrder`].
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub garment_type: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
}

/// Customer contact details copied onto invoices and receipts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSnapshot {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Non-empty city and country joined with `", "`
    pub address: Option<String>,
}

impl CustomerSnapshot {
    /// Takes a snapshot of `customer`, falling back to [`DEFAULT_CUSTOMER_LABEL`].
    #[must_use]
    pub fn of(customer: Option<&customer::Model>) -> Self {
        let Some(customer) = customer else {
            return Self {
                name: DEFAULT_CUSTOMER_LABEL.to_string(),
                phone: None,
                email: None,
                address: None,
            };
        };

        let name = customer
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER_LABEL)
            .to_string();

        let address_parts: Vec<&str> = [customer.city.as_deref(), customer.country.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        let address = (!address_parts.is_empty()).then(|| address_parts.join(", "));

        Self {
            name,
            phone: customer.phone.clone(),
            email: customer.email.clone(),
            address,
        }
    }
}

/// Creates a custom order together with its garment lines.
///
/// Rejects a negative material cost, non-positive quantities and negative unit prices.
#[instrument(skip(db, input), fields(order_number = %input.order_number))]
pub async fn create_custom_order(
    db: &DatabaseConnection,
    input: NewCustomOrder,
) -> Result<custom_order::Model> {
    if input.material_cost < 0 {
        return Err(Error::InvalidAmount {
            amount: input.material_cost,
        });
    }
    for item in &input.items {
        if item.quantity <= 0 {
            return Err(Error::InvalidQuantity {
                quantity: item.quantity,
            });
        }
        if item.unit_price < 0 {
            return Err(Error::InvalidAmount {
                amount: item.unit_price,
            });
        }
    }

    let txn = db.begin().await?;

    let order = custom_order::ActiveModel {
        order_number: Set(input.order_number.trim().to_string()),
        customer_id: Set(input.customer_id),
        order_date: Set(input.order_date),
        pickup_date: Set(input.pickup_date),
        material_cost: Set(input.material_cost),
        notes: Set(input.notes),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for item in input.items {
        custom_order_item::ActiveModel {
            custom_order_id: Set(order.id),
            garment_type: Set(item.garment_type),
            description: Set(item.description),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(order_id = order.id, "Custom order created");
    Ok(order)
}

/// Finds a custom order by id.
pub async fn get_custom_order<C>(db: &C, custom_order_id: i64) -> Result<Option<custom_order::Model>>
where
    C: ConnectionTrait,
{
    CustomOrder::find_by_id(custom_order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Garment lines of an order, in creation order.
pub async fn get_order_items<C>(db: &C, custom_order_id: i64) -> Result<Vec<custom_order_item::Model>>
where
    C: ConnectionTrait,
{
    CustomOrderItem::find()
        .filter(custom_order_item::Column::CustomOrderId.eq(custom_order_id))
        .order_by_asc(custom_order_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Payments recorded on an order, oldest first.
pub async fn get_order_payments<C>(
    db: &C,
    custom_order_id: i64,
) -> Result<Vec<custom_order_payment::Model>>
where
    C: ConnectionTrait,
{
    CustomOrderPayment::find()
        .filter(custom_order_payment::Column::CustomOrderId.eq(custom_order_id))
        .order_by_asc(custom_order_payment::Column::PaidAt)
        .order_by_asc(custom_order_payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
