//! Boundary layer for the REST resources.
//!
//! Each submodule maps one resource's operations (list, retrieve, create, replace,
//! partial update, destroy) onto the core functions, translating wire payloads into core
//! arguments and core results into views. Routing, authentication and status mapping
//! belong to the caller; [`crate::errors::Error::kind`] gives it the response class.

/// Order resource: payloads, views and operations
pub mod orders;
/// Product resource: payloads, views and operations
pub mod products;

pub use orders::{DetailPayload, DetailView, OrderPayload, OrderView};
pub use products::{ProductPayload, ProductView};
