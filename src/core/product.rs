//! Product business logic - the product store.
//!
//! This module provides functions for creating, retrieving, updating, and deleting products.
//! Names are unique and prices are non-negative. A product that is still referenced by an
//! order detail cannot be deleted. Updating a product's price does not touch existing line
//! items; their prices follow the new price only when their order is next reconciled.

use crate::{
    config::catalog::CatalogProduct,
    entities::{OrderDetail, Product, order_detail, product},
    errors::{Error, Result, Violation, violation},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Longest product name accepted.
pub const MAX_NAME_LEN: usize = 100;

/// Field changes for [`update_product`]. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    /// New name, if it changes
    pub name: Option<String>,
    /// New unit price, if it changes
    pub price: Option<f64>,
}

/// Trims and checks a product name.
fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidName {
            message: "Product name cannot be empty".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::InvalidName {
            message: format!("Product name cannot exceed {MAX_NAME_LEN} characters"),
        });
    }
    Ok(name.to_string())
}

fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidPrice { price });
    }
    Ok(price)
}

/// Retrieves all products, ordered by id.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, returning None if it does not exist.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by ID, failing with `ProductNotFound` if it does not exist.
pub async fn get_product<C>(db: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Finds a product by its exact name.
pub async fn get_product_by_name<C>(db: &C, name: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product, performing input validation.
///
/// The name is trimmed before it is stored and compared.
///
/// # Errors
/// Returns an error if:
/// - The name is empty, whitespace-only or too long (`InvalidName`)
/// - The price is negative or not finite (`InvalidPrice`)
/// - Another product already has this name (`DuplicateName`)
/// - The database insert fails
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    price: f64,
) -> Result<product::Model> {
    let name = validate_name(&name)?;
    let price = validate_price(price)?;

    if get_product_by_name(db, &name).await?.is_some() {
        return Err(Error::DuplicateName { name });
    }

    let product = product::ActiveModel {
        name: Set(name.clone()),
        price: Set(price),
        ..Default::default()
    };
    let created = product
        .insert(db)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique) => Error::DuplicateName { name: name.clone() },
            _ => e.into(),
        })?;

    info!(product_id = created.id, name = %created.name, price = created.price, "Created product");
    Ok(created)
}

/// Updates an existing product's name and/or price.
///
/// Both fields set is a full replace, one field set is a partial update.
///
/// # Errors
/// Returns an error if:
/// - A supplied name or price is invalid
/// - The product does not exist (`ProductNotFound`)
/// - The new name belongs to another product (`DuplicateName`)
/// - The database update fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    changes: ProductChanges,
) -> Result<product::Model> {
    let new_name = changes.name.as_deref().map(validate_name).transpose()?;
    let new_price = changes.price.map(validate_price).transpose()?;

    let existing = get_product(db, product_id).await?;
    if new_name.is_none() && new_price.is_none() {
        return Ok(existing);
    }

    if let Some(name) = &new_name
        && *name != existing.name
        && get_product_by_name(db, name).await?.is_some()
    {
        return Err(Error::DuplicateName { name: name.clone() });
    }

    let mut product: product::ActiveModel = existing.into();
    if let Some(name) = new_name.clone() {
        product.name = Set(name);
    }
    if let Some(price) = new_price {
        product.price = Set(price);
    }

    let updated = product
        .update(db)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique) => Error::DuplicateName {
                name: new_name.clone().unwrap_or_default(),
            },
            _ => e.into(),
        })?;

    info!(product_id, name = %updated.name, price = updated.price, "Updated product");
    Ok(updated)
}

/// Maps a failed product delete, reporting the restrict foreign key as `Referenced`.
fn blocked_delete(err: DbErr, product_id: i64, references: u64) -> Error {
    match violation(&err) {
        Some(Violation::ForeignKey) => Error::Referenced {
            product: product_id,
            references,
        },
        _ => err.into(),
    }
}

/// Deletes a product that no order detail references.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist (`ProductNotFound`)
/// - Any order detail still references it (`Referenced`); the product is left in place
/// - The database delete fails
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    get_product(&txn, product_id).await?;

    let references = OrderDetail::find()
        .filter(order_detail::Column::ProductId.eq(product_id))
        .count(&txn)
        .await?;
    if references > 0 {
        return Err(Error::Referenced {
            product: product_id,
            references,
        });
    }

    Product::delete_by_id(product_id)
        .exec(&txn)
        .await
        .map_err(|e| blocked_delete(e, product_id, references))?;

    txn.commit().await?;

    info!(product_id, "Deleted product");
    Ok(())
}

/// Inserts every catalog product whose name is not already taken.
///
/// Returns the number of products created.
pub async fn seed_products(db: &DatabaseConnection, catalog: &[CatalogProduct]) -> Result<usize> {
    let mut created = 0;
    for entry in catalog {
        if get_product_by_name(db, entry.name.trim()).await?.is_some() {
            debug!(name = %entry.name, "Catalog product already present");
            continue;
        }
        create_product(db, entry.name.clone(), entry.price).await?;
        created += 1;
    }
    Ok(created)
}
