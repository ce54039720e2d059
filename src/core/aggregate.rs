//! The order aggregate: one order together with its line items.
//!
//! Prices are derived here and nowhere else. A line's price is its quantity times the
//! product's unit price at the moment the line is written; an order's total is the sum of
//! its line prices.

use crate::{
    entities::{Order, OrderDetail, order, order_detail},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, prelude::*};
use std::fmt;

/// Price of a line of `quantity` units at `unit_price` each.
#[must_use]
pub fn line_price(quantity: i32, unit_price: f64) -> f64 {
    f64::from(quantity) * unit_price
}

/// An order and its line items, ordered by line id.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAggregate {
    /// The order row
    pub order: order::Model,
    /// Line items owned by the order
    pub details: Vec<order_detail::Model>,
}

impl OrderAggregate {
    /// Builds an aggregate, putting the line items in id order.
    #[must_use]
    pub fn new(order: order::Model, mut details: Vec<order_detail::Model>) -> Self {
        details.sort_by_key(|detail| detail.id);
        Self { order, details }
    }

    /// Loads an order and its line items.
    ///
    /// # Errors
    /// Returns `OrderNotFound` if no order has this id.
    pub async fn load<C>(db: &C, order_id: i64) -> Result<Self>
    where
        C: ConnectionTrait,
    {
        let order = Order::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or(Error::OrderNotFound { id: order_id })?;
        let details = order
            .find_related(OrderDetail)
            .order_by_asc(order_detail::Column::Id)
            .all(db)
            .await?;
        Ok(Self::new(order, details))
    }

    /// Order id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.order.id
    }

    /// Sum of all line prices.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.details.iter().map(|detail| detail.price).sum()
    }

    /// The line item for `product_id`, if the order has one.
    #[must_use]
    pub fn detail_for(&self, product_id: i64) -> Option<&order_detail::Model> {
        self.details
            .iter()
            .find(|detail| detail.product_id == product_id)
    }
}

impl fmt::Display for OrderAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{} of {}", self.order.id, self.order.date_time)
    }
}
