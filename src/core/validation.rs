//! Order detail validation.
//!
//! A pure pass over the line items a client proposes for an order. It runs before any
//! database work, so a rejected payload never opens a transaction.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One line item as submitted by a client. Both fields are required; they are optional
/// here so a missing field can be reported by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedDetail {
    /// Referenced product id
    #[serde(default, alias = "product_id")]
    pub product: Option<i64>,
    /// Requested number of units
    #[serde(default)]
    pub quantity: Option<i32>,
}

impl ProposedDetail {
    /// A complete line item.
    #[must_use]
    pub const fn new(product: i64, quantity: i32) -> Self {
        Self {
            product: Some(product),
            quantity: Some(quantity),
        }
    }
}

/// A line item that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedLine {
    /// Referenced product id
    pub product_id: i64,
    /// Number of units, always positive
    pub quantity: i32,
}

/// Checks every proposed line item and returns them typed, in submission order.
///
/// Entries are checked in order and the first problem is returned:
/// - `MissingField` when `quantity` or `product` is absent
/// - `InvalidQuantity` when the quantity is zero or negative
/// - `DuplicateProduct` when a product appears a second time
pub fn validate_details(details: &[ProposedDetail]) -> Result<Vec<ProposedLine>> {
    let mut seen = HashSet::with_capacity(details.len());
    let mut lines = Vec::with_capacity(details.len());

    for detail in details {
        let quantity = detail
            .quantity
            .ok_or(Error::MissingField { field: "quantity" })?;
        let product_id = detail
            .product
            .ok_or(Error::MissingField { field: "product" })?;

        if quantity <= 0 {
            return Err(Error::InvalidQuantity {
                product: product_id,
                quantity,
            });
        }
        if !seen.insert(product_id) {
            return Err(Error::DuplicateProduct {
                product: product_id,
            });
        }

        lines.push(ProposedLine {
            product_id,
            quantity,
        });
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_valid_details_keep_order() {
        let lines =
            validate_details(&[ProposedDetail::new(2, 1), ProposedDetail::new(1, 3)]).unwrap();
        assert_eq!(
            lines,
            vec![
                ProposedLine {
                    product_id: 2,
                    quantity: 1
                },
                ProposedLine {
                    product_id: 1,
                    quantity: 3
                },
            ]
        );
    }

    #[test]
    fn test_empty_details_are_valid() {
        assert!(validate_details(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let missing_quantity = ProposedDetail {
            product: Some(1),
            quantity: None,
        };
        assert!(matches!(
            validate_details(&[missing_quantity]).unwrap_err(),
            Error::MissingField { field: "quantity" }
        ));

        let missing_product = ProposedDetail {
            product: None,
            quantity: Some(1),
        };
        assert!(matches!(
            validate_details(&[ProposedDetail::new(1, 1), missing_product]).unwrap_err(),
            Error::MissingField { field: "product" }
        ));
    }

    #[test]
    fn test_non_positive_quantities() {
        for quantity in [0, -1, i32::MIN] {
            let result = validate_details(&[ProposedDetail::new(4, quantity)]);
            assert!(matches!(
                result.unwrap_err(),
                Error::InvalidQuantity { product: 4, quantity: q } if q == quantity
            ));
        }
    }

    #[test]
    fn test_invalid_quantity_anywhere_in_sequence() {
        let details = [
            ProposedDetail::new(1, 2),
            ProposedDetail::new(2, 5),
            ProposedDetail::new(3, 0),
        ];
        assert!(matches!(
            validate_details(&details).unwrap_err(),
            Error::InvalidQuantity { product: 3, .. }
        ));
    }

    #[test]
    fn test_duplicate_product() {
        let details = [
            ProposedDetail::new(1, 1),
            ProposedDetail::new(2, 1),
            ProposedDetail::new(1, 2),
        ];
        assert!(matches!(
            validate_details(&details).unwrap_err(),
            Error::DuplicateProduct { product: 1 }
        ));
    }

    #[test]
    fn test_deserialize_accepts_product_id_alias() {
        let detail: ProposedDetail =
            serde_json::from_str(r#"{"product_id": 7, "quantity": 2}"#).unwrap();
        assert_eq!(detail, ProposedDetail::new(7, 2));

        let detail: ProposedDetail = serde_json::from_str(r#"{"product": 7}"#).unwrap();
        assert_eq!(detail.quantity, None);
    }
}
