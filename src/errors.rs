//! Unified error type for the order desk.
//!
//! Every fallible operation returns [`Result`]. Variants carry enough context (field name,
//! offending product or order id) for the API layer to build a user-facing message, and
//! [`Error::kind`] tells it which class of response to send.

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A line item or payload is missing a required field.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field as it appears on the wire
        field: &'static str,
    },

    /// A line item asks for zero or a negative number of units.
    #[error("Quantity must be positive (got {quantity} for product {product})")]
    InvalidQuantity {
        /// Product the offending line refers to
        product: i64,
        /// Submitted quantity
        quantity: i32,
    },

    /// The same product appears twice in one order.
    #[error("Products must be different within an order; product {product} is repeated")]
    DuplicateProduct {
        /// The repeated product id
        product: i64,
    },

    /// A product name is empty or too long.
    #[error("Invalid product name: {message}")]
    InvalidName {
        /// What is wrong with the name
        message: String,
    },

    /// A product price is negative or not a finite number.
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// Submitted price
        price: f64,
    },

    /// No product exists with this id.
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// No order exists with this id.
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Requested order id
        id: i64,
    },

    /// Another product already uses this name.
    #[error("A product named '{name}' already exists")]
    DuplicateName {
        /// The conflicting name
        name: String,
    },

    /// The product is still referenced by order line items.
    #[error("Product {product} is referenced by {references} order detail(s)")]
    Referenced {
        /// Product that could not be deleted
        product: i64,
        /// Number of line items pointing at it
        references: u64,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Storage fault that is not a known constraint violation.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure outside the database.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable could not be read.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Broad classes of failure, used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client sent something malformed
    InvalidInput,
    /// A referenced entity does not exist
    NotFound,
    /// A store constraint would be violated
    Conflict,
    /// Anything the client cannot fix
    Internal,
}

impl ErrorKind {
    /// HTTP status code equivalent for this class.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

impl Error {
    /// Classifies the error for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. }
            | Self::InvalidQuantity { .. }
            | Self::DuplicateProduct { .. }
            | Self::InvalidName { .. }
            | Self::InvalidPrice { .. } => ErrorKind::InvalidInput,
            Self::ProductNotFound { .. } | Self::OrderNotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateName { .. } | Self::Referenced { .. } => ErrorKind::Conflict,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Store constraint a failed statement ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    /// A unique column or index
    Unique,
    /// A foreign key, on insert or on delete
    ForeignKey,
}

/// `SQLite` extended code for a foreign key blocked by `ON DELETE RESTRICT`.
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

/// Recognizes constraint violations reported by the database driver.
pub(crate) fn violation(err: &DbErr) -> Option<Violation> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Some(Violation::Unique),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => Some(Violation::ForeignKey),
        _ if is_restrict_violation(err) => Some(Violation::ForeignKey),
        _ => None,
    }
}

/// `SQLite` reports a RESTRICT failure as a trigger constraint, which `sql_err` does not map.
fn is_restrict_violation(err: &DbErr) -> bool {
    let (DbErr::Exec(RuntimeErr::SqlxError(sqlx_err))
    | DbErr::Query(RuntimeErr::SqlxError(sqlx_err))) = err
    else {
        return false;
    };
    sqlx_err.as_database_error().is_some_and(|db_err| {
        db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER)
            || db_err.message().contains("FOREIGN KEY constraint failed")
    })
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
