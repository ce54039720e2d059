/// Order aggregate: line pricing and totals
pub mod aggregate;
/// Order creation, reconciliation, queries and deletion
pub mod order;
/// Product store
pub mod product;
/// Keyed set reconciliation producing edit scripts
pub mod reconcile;
/// Validation of proposed order line items
pub mod validation;
