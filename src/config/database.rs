//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so unique constraints and foreign keys
//! always match the Rust structs without hand-written SQL.

use crate::entities::{
    CustomOrder, CustomOrderItem, CustomOrderPayment, Customer, Invoice, InvoiceItem,
    InvoicePayment, Receipt, Staff,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/tailor_billing.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates every billing table that does not exist yet.
///
/// Parents are created before children so foreign keys resolve on backends
/// that check them at creation time.
#[instrument(skip(db))]
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Customer).await?;
    create_table(db, &schema, Staff).await?;
    create_table(db, &schema, CustomOrder).await?;
    create_table(db, &schema, CustomOrderItem).await?;
    create_table(db, &schema, Invoice).await?;
    create_table(db, &schema, InvoiceItem).await?;
    create_table(db, &schema, InvoicePayment).await?;
    create_table(db, &schema, CustomOrderPayment).await?;
    create_table(db, &schema, Receipt).await?;

    info!("Billing tables ensured");
    Ok(())
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
