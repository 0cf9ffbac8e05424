//! # Error Types
//!
//! Domain-specific error types for quotecraft-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quotecraft-core errors (this file)                                    │
//! │  ├── CoreError        - Pricing and quote rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  quotecraft-db errors (separate crate)                                 │
//! │  └── DbError          - Catalog / export storage failures              │
//! │                                                                         │
//! │  quote-desk errors (in app)                                            │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, index, extra id)
//! 3. Errors are enum variants, never String
//! 4. A failed operation never leaves the quote half-updated

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core quote engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A width or height is not a real size: zero, negative, or above
    /// [`crate::MAX_DIMENSION_CM`].
    ///
    /// ## When This Occurs
    /// - Computing an area from out-of-range dimensions
    /// - Committing a line before both dimensions are entered
    #[error("Invalid {field}: {value} cm (must be between 1 and {max} cm)", max = crate::MAX_DIMENSION_CM)]
    InvalidDimension { field: String, value: i64 },

    /// Something that needs its own dimensions does not have usable ones.
    ///
    /// ## When This Occurs
    /// - A selected extra that does not use the product dimensions has no
    ///   custom width/height at commit time
    /// - An area-priced custom feature has no positive width/height
    ///
    /// ## User Workflow
    /// ```text
    /// Select extra "Mosquito net" (own dimensions)
    ///      │
    ///      ▼
    /// Leave width/height empty, click "Add to selection"
    ///      │
    ///      ▼
    /// MissingDimension { subject: "extra 7 (Mosquito net)" }
    ///      │
    ///      ▼
    /// UI shows: "Enter dimensions for all extras"
    /// ```
    #[error("Missing dimensions for {subject}")]
    MissingDimension { subject: String },

    /// A line reference does not exist in the quote.
    #[error("Line index {index} is out of range (quote has {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The computed line price is zero or negative, so it cannot be committed.
    #[error("Line price must be greater than zero (computed {cents} cents)")]
    NonPositivePrice { cents: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidDimension error for a named field.
    pub fn invalid_dimension(field: impl Into<String>, value: i64) -> Self {
        CoreError::InvalidDimension {
            field: field.into(),
            value,
        }
    }

    /// Creates a MissingDimension error for a described subject.
    pub fn missing_dimension(subject: impl Into<String>) -> Self {
        CoreError::MissingDimension {
            subject: subject.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements, before any pricing
/// rule runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
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

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid_dimension("width", 0);
        assert_eq!(
            err.to_string(),
            "Invalid width: 0 cm (must be between 1 and 100000 cm)"
        );

        let err = CoreError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(
            err.to_string(),
            "Line index 3 is out of range (quote has 2 lines)"
        );

        let err = CoreError::missing_dimension("extra 7 (Mosquito net)");
        assert_eq!(
            err.to_string(),
            "Missing dimensions for extra 7 (Mosquito net)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "feature name".to_string(),
        };
        assert_eq!(err.to_string(), "feature name is required");

        let err = ValidationError::MustBePositive {
            field: "feature price".to_string(),
        };
        assert_eq!(err.to_string(), "feature price must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "feature name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
