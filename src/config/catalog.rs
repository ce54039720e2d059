//! Product catalog loading from config.toml
//!
//! The products listed in the catalog file are seeded into the database at startup.
//! Seeding is keyed by name, so products that already exist are left alone.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire catalog file
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// Products to seed
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
}

/// A single product entry
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogProduct {
    /// Unique product name
    pub name: String,
    /// Unit price
    pub price: f64,
}

/// Loads the product catalog from a TOML file
///
/// # Errors
/// Returns `Error::Config` if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading product catalog from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file {}: {e}", path_ref.display()),
    })?;

    parse_catalog(&contents)
}

/// Parses catalog TOML
pub fn parse_catalog(contents: &str) -> Result<Catalog> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog: {e}"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let toml_str = r#"
            [[products]]
            name = "puerta"
            price = 100.0

            [[products]]
            name = "vaso"
            price = 5.5
        "#;

        let catalog = parse_catalog(toml_str).unwrap();
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.products[0].name, "puerta");
        assert_eq!(catalog.products[0].price, 100.0);
        assert_eq!(catalog.products[1].name, "vaso");
        assert_eq!(catalog.products[1].price, 5.5);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = parse_catalog("").unwrap();
        assert!(catalog.products.is_empty());
    }

    #[test]
    fn test_missing_price_is_config_error() {
        let result = parse_catalog("[[products]]\nname = \"plato\"\n");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_catalog("/nonexistent/catalog.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
