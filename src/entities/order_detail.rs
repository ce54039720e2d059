//! Order detail entity - One line item of an order.
//!
//! Each detail belongs to exactly one order (deleted with it) and points at one product
//! (which is protected from deletion while referenced). The pair (`order_id`, `product_id`)
//! is unique; the index is created alongside the tables in `config::database`.
//! `price` is always derived from the quantity and the product's price when the line is
//! written, never taken from the client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order detail database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_details")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning order
    pub order_id: i64,
    /// Product being sold
    pub product_id: i64,
    /// Number of units, always positive
    pub quantity: i32,
    /// Line price: `quantity` times the product price when the line was last written
    pub price: f64,
}

/// Defines relationships between `OrderDetail` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each detail belongs to one order and is removed with it
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Order,
    /// Each detail references one product, which may not be deleted while referenced
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
