//! Product resource.

use crate::{
    core::product::{self, ProductChanges},
    entities::product::Model,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Body of a product create, replace or partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    /// Product name
    #[serde(default)]
    pub name: Option<String>,
    /// Unit price
    #[serde(default)]
    pub price: Option<f64>,
}

/// A product as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    /// Product id
    pub id: i64,
    /// Unique name
    pub name: String,
    /// Unit price
    pub price: f64,
}

impl From<Model> for ProductView {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
        }
    }
}

fn require_all(payload: ProductPayload) -> Result<(String, f64)> {
    let name = payload.name.ok_or(Error::MissingField { field: "name" })?;
    let price = payload.price.ok_or(Error::MissingField { field: "price" })?;
    Ok((name, price))
}

/// All products, by id.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<ProductView>> {
    Ok(product::list_products(db)
        .await?
        .into_iter()
        .map(ProductView::from)
        .collect())
}

/// One product.
pub async fn retrieve(db: &DatabaseConnection, id: i64) -> Result<ProductView> {
    product::get_product(db, id).await.map(ProductView::from)
}

/// Creates a product; `name` and `price` are required.
pub async fn create(db: &DatabaseConnection, payload: ProductPayload) -> Result<ProductView> {
    let (name, price) = require_all(payload)?;
    product::create_product(db, name, price)
        .await
        .map(ProductView::from)
        .inspect_err(|e| warn!("Product create rejected: {e}"))
}

/// Replaces a product's fields; `name` and `price` are required.
pub async fn replace(
    db: &DatabaseConnection,
    id: i64,
    payload: ProductPayload,
) -> Result<ProductView> {
    let (name, price) = require_all(payload)?;
    let changes = ProductChanges {
        name: Some(name),
        price: Some(price),
    };
    product::update_product(db, id, changes)
        .await
        .map(ProductView::from)
        .inspect_err(|e| warn!(product_id = id, "Product replace rejected: {e}"))
}

/// Updates whichever fields the payload carries.
pub async fn partial_update(
    db: &DatabaseConnection,
    id: i64,
    payload: ProductPayload,
) -> Result<ProductView> {
    let changes = ProductChanges {
        name: payload.name,
        price: payload.price,
    };
    product::update_product(db, id, changes)
        .await
        .map(ProductView::from)
        .inspect_err(|e| warn!(product_id = id, "Product update rejected: {e}"))
}

/// Deletes a product that no order references.
pub async fn destroy(db: &DatabaseConnection, id: i64) -> Result<()> {
    product::delete_product(db, id)
        .await
        .inspect_err(|e| warn!(product_id = id, "Product delete rejected: {e}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_utils::*;

    fn payload(json: &str) -> ProductPayload {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_product_resource_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create(&db, payload(r#"{"name": "zapatillas", "price": 100}"#)).await?;
        assert_eq!(created.name, "zapatillas");
        assert_eq!(created.price, 100.0);
        assert_eq!(retrieve(&db, created.id).await?, created);

        let replaced = replace(
            &db,
            created.id,
            payload(r#"{"name": "new_name", "price": 20}"#),
        )
        .await?;
        assert_eq!(replaced.name, "new_name");
        assert_eq!(replaced.price, 20.0);

        let patched = partial_update(&db, created.id, payload(r#"{"price": 70}"#)).await?;
        assert_eq!(patched.name, "new_name");
        assert_eq!(patched.price, 70.0);

        assert_eq!(list(&db).await?, vec![patched]);

        destroy(&db, created.id).await?;
        let err = retrieve(&db, created.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_replace_require_all_fields() -> Result<()> {
        let db = setup_test_db().await?;

        let err = create(&db, payload(r#"{"price": 1}"#)).await.unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "name" }));

        let product = create_test_product(&db, "plato").await?;
        let err = replace(&db, product.id, payload(r#"{"name": "x"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "price" }));
        assert_eq!(err.kind().status_code(), 400);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "cuchara").await?;

        let err = create(&db, payload(r#"{"name": "cuchara", "price": 3}"#))
            .await
            .unwrap_err();
        assert_eq!(err.kind().status_code(), 409);

        Ok(())
    }

    #[test]
    fn test_view_shape() {
        let view = ProductView {
            id: 1,
            name: "puerta".to_string(),
            price: 5.5,
        };
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({"id": 1, "name": "puerta", "price": 5.5})
        );
    }
}
