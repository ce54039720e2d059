//! Order business logic - creating, reconciling, reading and deleting orders.
//!
//! Creating and updating an order share one path: validate the proposed line items, open a
//! transaction, resolve every referenced product, plan the edit script against the stored
//! line items, and apply it. Every product is resolved before the first write, and the
//! transaction is only committed once all edits succeed, so a failed call leaves the stored
//! order exactly as it was.

use crate::{
    core::{
        aggregate::{OrderAggregate, line_price},
        reconcile::{self, EditScript},
        validation::{ProposedDetail, ProposedLine, validate_details},
    },
    entities::{Order, OrderDetail, Product, order, order_detail, product},
    errors::{Error, Result, Violation, violation},
};
use sea_orm::{LoaderTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info};

type DetailScript = EditScript<i64, order_detail::Model, ProposedLine>;

/// Loads every product the lines reference, failing on the first one that does not exist.
async fn resolve_products<C>(db: &C, lines: &[ProposedLine]) -> Result<HashMap<i64, product::Model>>
where
    C: ConnectionTrait,
{
    if lines.is_empty() {
        return Ok(HashMap::new());
    }

    let ids: Vec<i64> = lines.iter().map(|line| line.product_id).collect();
    let products: HashMap<i64, product::Model> = Product::find()
        .filter(product::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    if let Some(missing) = lines
        .iter()
        .find(|line| !products.contains_key(&line.product_id))
    {
        return Err(Error::ProductNotFound {
            id: missing.product_id,
        });
    }

    Ok(products)
}

/// Price of a validated line at the product's current price.
fn price_line(line: &ProposedLine, products: &HashMap<i64, product::Model>) -> Result<f64> {
    products
        .get(&line.product_id)
        .map(|product| line_price(line.quantity, product.price))
        .ok_or(Error::ProductNotFound {
            id: line.product_id,
        })
}

/// Applies a planned edit script to the line items of `order_id`.
///
/// Deletes run first, then in-place updates, then inserts. Every written line gets its
/// price recomputed from the product's current price.
async fn apply_script<C>(
    db: &C,
    order_id: i64,
    script: DetailScript,
    products: &HashMap<i64, product::Model>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    debug!(
        order_id,
        inserts = script.inserts.len(),
        updates = script.updates.len(),
        deletes = script.deletes.len(),
        "Applying order detail edits"
    );

    if !script.deletes.is_empty() {
        let ids: Vec<i64> = script.deletes.iter().map(|detail| detail.id).collect();
        OrderDetail::delete_many()
            .filter(order_detail::Column::Id.is_in(ids))
            .exec(db)
            .await?;
    }

    for (existing, line) in script.updates {
        let price = price_line(&line, products)?;
        let mut detail: order_detail::ActiveModel = existing.into();
        detail.quantity = Set(line.quantity);
        detail.price = Set(price);
        detail.update(db).await?;
    }

    for (product_id, line) in script.inserts {
        let price = price_line(&line, products)?;
        order_detail::ActiveModel {
            order_id: Set(order_id),
            product_id: Set(product_id),
            quantity: Set(line.quantity),
            price: Set(price),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique) => Error::DuplicateProduct {
                product: product_id,
            },
            Some(Violation::ForeignKey) => Error::ProductNotFound { id: product_id },
            None => e.into(),
        })?;
    }

    Ok(())
}

fn keyed(lines: &[ProposedLine]) -> impl Iterator<Item = (i64, ProposedLine)> + '_ {
    lines.iter().map(|line| (line.product_id, *line))
}

/// Creates an order with the given line items in a single transaction.
///
/// # Errors
/// Returns an error if:
/// - The line items fail validation (`MissingField`, `InvalidQuantity`, `DuplicateProduct`);
///   nothing is written
/// - A referenced product does not exist (`ProductNotFound`); nothing is written
/// - The database fails; the transaction is rolled back
pub async fn create_order(
    db: &DatabaseConnection,
    date_time: DateTime,
    details: &[ProposedDetail],
) -> Result<OrderAggregate> {
    let lines = validate_details(details)?;

    let txn = db.begin().await?;
    let products = resolve_products(&txn, &lines).await?;

    let order = order::ActiveModel {
        date_time: Set(date_time),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let script = reconcile::plan(Vec::new(), keyed(&lines));
    apply_script(&txn, order.id, script, &products).await?;

    let created = OrderAggregate::load(&txn, order.id).await?;
    txn.commit().await?;

    info!(
        order_id = created.id(),
        lines = created.details.len(),
        total = created.total(),
        "Created order"
    );
    Ok(created)
}

/// Reconciles an existing order with a proposed set of line items.
///
/// The timestamp is replaced when `date_time` is given. Line items whose product is in the
/// proposal are updated in place, new products are inserted, and products missing from the
/// proposal have their line items deleted. Every remaining line is repriced from the current
/// product price. Calling this twice with the same details gives the same result as once.
///
/// # Errors
/// Returns an error if:
/// - The line items fail validation; the order is not touched
/// - The order does not exist (`OrderNotFound`)
/// - A referenced product does not exist (`ProductNotFound`); the order is not touched
/// - The database fails; the transaction is rolled back
pub async fn update_order(
    db: &DatabaseConnection,
    order_id: i64,
    date_time: Option<DateTime>,
    details: &[ProposedDetail],
) -> Result<OrderAggregate> {
    let lines = validate_details(details)?;

    let txn = db.begin().await?;
    let current = OrderAggregate::load(&txn, order_id).await?;
    let products = resolve_products(&txn, &lines).await?;

    if let Some(date_time) = date_time
        && date_time != current.order.date_time
    {
        let mut order: order::ActiveModel = current.order.clone().into();
        order.date_time = Set(date_time);
        order.update(&txn).await?;
    }

    let stored = current
        .details
        .into_iter()
        .map(|detail| (detail.product_id, detail));
    let script = reconcile::plan(stored, keyed(&lines));
    apply_script(&txn, order_id, script, &products).await?;

    let updated = OrderAggregate::load(&txn, order_id).await?;
    txn.commit().await?;

    info!(
        order_id,
        lines = updated.details.len(),
        total = updated.total(),
        "Updated order"
    );
    Ok(updated)
}

/// Retrieves an order with its line items.
pub async fn get_order(db: &DatabaseConnection, order_id: i64) -> Result<OrderAggregate> {
    OrderAggregate::load(db, order_id).await
}

/// Retrieves every order with its line items, ordered by id.
pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<OrderAggregate>> {
    let orders = Order::find()
        .order_by_asc(order::Column::Id)
        .all(db)
        .await?;
    let details = orders.load_many(OrderDetail, db).await?;

    Ok(orders
        .into_iter()
        .zip(details)
        .map(|(order, details)| OrderAggregate::new(order, details))
        .collect())
}

/// Deletes an order together with its line items.
///
/// # Errors
/// Returns `OrderNotFound` if no order has this id.
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let removed_lines = OrderDetail::delete_many()
        .filter(order_detail::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?
        .rows_affected;
    let removed = Order::delete_by_id(order_id).exec(&txn).await?;
    if removed.rows_affected == 0 {
        return Err(Error::OrderNotFound { id: order_id });
    }

    txn.commit().await?;

    info!(order_id, removed_lines, "Deleted order");
    Ok(())
}
