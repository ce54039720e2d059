/// Database configuration and connection management
pub mod database;

/// Product catalog loading from config.toml
pub mod catalog;

use std::path::PathBuf;

/// Default location of the product catalog when `CATALOG_PATH` is not set.
pub const DEFAULT_CATALOG_PATH: &str = "config.toml";

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Connection string handed to `SeaORM`
    pub database_url: String,
    /// Path of the TOML product catalog seeded at startup
    pub catalog_path: PathBuf,
}

impl Settings {
    /// Reads `DATABASE_URL` and `CATALOG_PATH`, falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: database::get_database_url(),
            catalog_path: std::env::var("CATALOG_PATH")
                .map_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from),
        }
    }
}
