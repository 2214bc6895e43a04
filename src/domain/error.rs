//! Validation errors for core domain types.
//!
//! These errors are raised before any store call is made. A rejected intent
//! never leaves a partial state behind.
//!
//! # Examples
//!
//! ```
//! use tirestock::domain::error::ValidationError;
//! use tirestock::domain::ledger::plan_movement;
//! use tirestock::domain::movement::MovementKind;
//!
//! let result = plan_movement(3, MovementKind::Salida, 5);
//! assert!(matches!(
//!     result,
//!     Err(ValidationError::InsufficientStock { requested: 5, available: 3 })
//! ));
//! ```

use thiserror::Error;

/// Errors that occur when a stock intent or a tire form violates domain rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The operation would leave the tire with negative stock.
    #[error("stock cannot be negative (current {current}, change {change})")]
    NegativeStock {
        /// Stock before the change.
        current: u32,
        /// Requested signed change.
        change: i64,
    },

    /// A removal asked for more units than the tire holds.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units requested for removal.
        requested: i64,
        /// Units currently in stock.
        available: u32,
    },

    /// Entrada, salida and transferencia need at least one unit.
    #[error("quantity must be at least 1, got {quantity}")]
    NonPositiveQuantity {
        /// The rejected quantity.
        quantity: i64,
    },

    /// Stock targets and initial stock must be zero or more.
    #[error("{field} cannot be negative, got {value}")]
    NegativeQuantity {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// Unit prices must be zero or more.
    #[error("price cannot be negative, got {price}")]
    NegativePrice {
        /// The rejected price.
        price: rust_decimal::Decimal,
    },

    /// A numeric form field did not parse.
    #[error("invalid number for {field}: '{value}'")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw input.
        value: String,
    },

    /// A value exceeds what the ledger can represent.
    #[error("{field} is out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// Quick adjustments move stock by exactly one unit.
    #[error("quick adjustment must be +1 or -1, got {change}")]
    InvalidStep {
        /// The rejected change.
        change: i64,
    },

    /// Required text field left blank.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    #[error("unknown tire category '{0}'")]
    UnknownCategory(String),

    #[error("unknown tire type '{0}'")]
    UnknownTireType(String),

    #[error("unknown movement type '{0}'")]
    UnknownMovementKind(String),
}
