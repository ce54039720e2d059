//! Shared test utilities for the order desk.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        aggregate::OrderAggregate,
        order,
        product,
        validation::ProposedDetail,
    },
    entities,
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed order timestamp: 2075-10-24 15:31:30.
pub fn test_date_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2075, 10, 24)
        .and_then(|date| date.and_hms_opt(15, 31, 30))
        .unwrap_or_default()
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * price: 10.0
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), 10.0).await
}

/// Creates a test product with custom price.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), price).await
}

/// Creates an order at [`test_date_time`] from `(product_id, quantity)` pairs.
pub async fn create_test_order(
    db: &DatabaseConnection,
    lines: &[(i64, i32)],
) -> Result<OrderAggregate> {
    let details: Vec<ProposedDetail> = lines
        .iter()
        .map(|&(product_id, quantity)| ProposedDetail::new(product_id, quantity))
        .collect();
    order::create_order(db, test_date_time(), &details).await
}

/// Sets up a database with two products.
/// Returns (db, P1 priced 10.0, P2 priced 5.0).
pub async fn setup_with_products() -> Result<(
    DatabaseConnection,
    entities::product::Model,
    entities::product::Model,
)> {
    let db = setup_test_db().await?;
    let p1 = create_custom_product(&db, "P1", 10.0).await?;
    let p2 = create_custom_product(&db, "P2", 5.0).await?;
    Ok((db, p1, p2))
}
