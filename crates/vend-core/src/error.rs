//! # Error Types
//!
//! Domain-specific error types for vend-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vend-core errors (this file)                                          │
//! │  ├── CoreError        - Domain errors with context                     │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Closed taxonomy callers branch on              │
//! │                                                                         │
//! │  vend-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  vend-cli errors (in app)                                              │
//! │  └── AppError         - What the menu loop sees                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item code, quantities)
//! 3. Errors are enum variants, never String
//! 4. Every variant maps to exactly one [`ErrorKind`]

use thiserror::Error;

use crate::types::ItemCode;

// =============================================================================
// Error Kind
// =============================================================================

/// The closed set of failure kinds a core operation can report.
///
/// `CoreError` carries the details for display; `ErrorKind` is what callers
/// match on when deciding how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The referenced item code is absent from the inventory or the cart.
    NotFound,
    /// An argument is out of range, missing, or not recognised.
    InvalidArgument,
    /// The requested quantity exceeds what the inventory currently holds.
    CapacityExceeded,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every operation that returns one of these has left both the cart and the
/// inventory exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Item code is not stocked in the machine.
    ///
    /// ## When This Occurs
    /// - Owner adjusts or removes an unknown code
    /// - Customer adds an unknown code to the cart
    /// - A carted item was removed from the inventory before checkout
    #[error("Item code {code} not found in inventory")]
    ItemNotFound { code: ItemCode },

    /// Item code is not in the customer's cart.
    #[error("Item code {code} not found in cart")]
    NotInCart { code: ItemCode },

    /// Not enough stock to satisfy the request.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart already holds 2 Soda, stock is 5
    ///      │
    ///      ▼
    /// Add 10 more Soda
    ///      │
    ///      ▼
    /// InsufficientStock { available: 5, requested: 12 }
    ///      │
    ///      ▼
    /// Menu shows: "Only 3 Soda(s) available for adding"
    /// ```
    #[error("Not enough {name} in inventory: available {available}, requested {requested}")]
    InsufficientStock {
        code: ItemCode,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Purchase confirmation was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// `adjust` was requested without a new quantity.
    #[error("A new quantity must be provided to adjust a cart item")]
    MissingQuantity,

    /// Cart management action tag was not recognised.
    #[error("Invalid action '{0}'. Use 'remove' or 'adjust'")]
    UnknownCartAction(String),

    /// The purchase session has already been finalized or abandoned.
    #[error("Purchase session is {state}, no further changes allowed")]
    SessionClosed { state: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Maps this error onto the closed failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ItemNotFound { .. } | CoreError::NotInCart { .. } => ErrorKind::NotFound,
            CoreError::InsufficientStock { .. } => ErrorKind::CapacityExceeded,
            CoreError::EmptyCart
            | CoreError::MissingQuantity
            | CoreError::UnknownCartAction(_)
            | CoreError::SessionClosed { .. }
            | CoreError::Validation(_) => ErrorKind::InvalidArgument,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when an argument doesn't meet requirements.
/// They are checked before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., not a number, illegal characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., item code or name already stocked).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub(crate) fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }

    pub(crate) fn must_not_be_negative(field: &str) -> Self {
        ValidationError::MustNotBeNegative {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_format(field: &str, reason: &str) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: u32) -> ItemCode {
        ItemCode::new(i64::from(raw)).unwrap()
    }

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            code: code(2),
            name: "Soda".to_string(),
            available: 5,
            requested: 12,
        };
        assert_eq!(
            err.to_string(),
            "Not enough Soda in inventory: available 5, requested 12"
        );

        let err = CoreError::ItemNotFound { code: code(99) };
        assert_eq!(err.to_string(), "Item code 99 not found in inventory");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::must_not_be_negative("quantity");
        assert_eq!(err.to_string(), "quantity cannot be negative");

        let err = ValidationError::Duplicate {
            field: "name".to_string(),
            value: "Water".to_string(),
        };
        assert_eq!(err.to_string(), "name 'Water' already exists");
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            CoreError::ItemNotFound { code: code(1) }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(CoreError::NotInCart { code: code(1) }.kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::EmptyCart.kind(), ErrorKind::InvalidArgument);
        assert_eq!(CoreError::MissingQuantity.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            CoreError::UnknownCartAction("swap".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            CoreError::InsufficientStock {
                code: code(1),
                name: "Water".into(),
                available: 1,
                requested: 2,
            }
            .kind(),
            ErrorKind::CapacityExceeded
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::must_be_positive("price").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::InvalidArgument);
    }
}
