//! Database configuration module for the order desk.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the foreign keys (cascade from orders, restrict from products) and the unique product
//! name come straight from the entity attributes. The composite unique index on order
//! details cannot be expressed on a single column and is created explicitly.

use crate::entities::{Order, OrderDetail, Product, order_detail};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::debug;

/// Default location of the database when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://order_desk.sqlite?mode=rwc";

/// Name of the unique index over (`order_id`, `product_id`).
pub const ORDER_PRODUCT_INDEX: &str = "idx_order_details_order_product";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
///
/// `SQLite` connections opened through sqlx enforce foreign keys, which the
/// delete rules on order details rely on.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables, skipping any that already exist.
///
/// Creates products, orders and order details (in dependency order), then the unique
/// index that keeps a product from appearing twice in one order.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(Product).if_not_exists().to_owned(),
        schema.create_table_from_entity(Order).if_not_exists().to_owned(),
        schema
            .create_table_from_entity(OrderDetail)
            .if_not_exists()
            .to_owned(),
    ];
    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    let order_product_index = Index::create()
        .name(ORDER_PRODUCT_INDEX)
        .table(OrderDetail)
        .col(order_detail::Column::OrderId)
        .col(order_detail::Column::ProductId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&order_product_index)).await?;

    Ok(())
}
