//! Order resource.
//!
//! Create and replace need a timestamp and a detail list. A partial update may leave the
//! timestamp out but still carries the full detail list: the stored line items are always
//! reconciled against it, so a product left out of the list is removed from the order.

use crate::{
    core::{aggregate::OrderAggregate, order, validation::ProposedDetail},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One submitted line item: `{product, quantity}` (`product_id` is accepted too).
pub type DetailPayload = ProposedDetail;

/// Body of an order create, replace or partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// When the order was placed
    #[serde(default)]
    pub date_time: Option<NaiveDateTime>,
    /// Proposed line items
    #[serde(default)]
    pub details: Option<Vec<DetailPayload>>,
}

/// A line item as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    /// Number of units
    pub quantity: i32,
    /// Line price
    pub price: f64,
    /// Product id
    pub product: i64,
}

/// An order as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    /// Order id
    pub id: i64,
    /// When the order was placed
    pub date_time: NaiveDateTime,
    /// Line items, in creation order
    pub details: Vec<DetailView>,
    /// Sum of the line prices
    pub total: f64,
}

impl From<&OrderAggregate> for OrderView {
    fn from(aggregate: &OrderAggregate) -> Self {
        Self {
            id: aggregate.order.id,
            date_time: aggregate.order.date_time,
            details: aggregate
                .details
                .iter()
                .map(|detail| DetailView {
                    quantity: detail.quantity,
                    price: detail.price,
                    product: detail.product_id,
                })
                .collect(),
            total: aggregate.total(),
        }
    }
}

impl From<OrderAggregate> for OrderView {
    fn from(aggregate: OrderAggregate) -> Self {
        Self::from(&aggregate)
    }
}

fn require_details(details: Option<Vec<DetailPayload>>) -> Result<Vec<DetailPayload>> {
    details.ok_or(Error::MissingField { field: "details" })
}

fn require_date_time(date_time: Option<NaiveDateTime>) -> Result<NaiveDateTime> {
    date_time.ok_or(Error::MissingField { field: "date_time" })
}

/// All orders, by id.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<OrderView>> {
    Ok(order::list_orders(db)
        .await?
        .into_iter()
        .map(OrderView::from)
        .collect())
}

/// One order.
pub async fn retrieve(db: &DatabaseConnection, id: i64) -> Result<OrderView> {
    order::get_order(db, id).await.map(OrderView::from)
}

/// Creates an order; `date_time` and `details` are required.
pub async fn create(db: &DatabaseConnection, payload: OrderPayload) -> Result<OrderView> {
    let date_time = require_date_time(payload.date_time)?;
    let details = require_details(payload.details)?;
    order::create_order(db, date_time, &details)
        .await
        .map(OrderView::from)
        .inspect_err(|e| warn!("Order create rejected: {e}"))
}

/// Replaces an order's timestamp and line items; both are required.
pub async fn replace(db: &DatabaseConnection, id: i64, payload: OrderPayload) -> Result<OrderView> {
    let date_time = require_date_time(payload.date_time)?;
    let details = require_details(payload.details)?;
    order::update_order(db, id, Some(date_time), &details)
        .await
        .map(OrderView::from)
        .inspect_err(|e| warn!(order_id = id, "Order replace rejected: {e}"))
}

/// Reconciles an order's line items, changing the timestamp only if one is given.
pub async fn partial_update(
    db: &DatabaseConnection,
    id: i64,
    payload: OrderPayload,
) -> Result<OrderView> {
    let details = require_details(payload.details)?;
    order::update_order(db, id, payload.date_time, &details)
        .await
        .map(OrderView::from)
        .inspect_err(|e| warn!(order_id = id, "Order update rejected: {e}"))
}

/// Deletes an order and its line items.
pub async fn destroy(db: &DatabaseConnection, id: i64) -> Result<()> {
    order::delete_order(db, id)
        .await
        .inspect_err(|e| warn!(order_id = id, "Order delete rejected: {e}"))
}
