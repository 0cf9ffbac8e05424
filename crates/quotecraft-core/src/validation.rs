//! # Validation Module
//!
//! Input validation and the commit gate for QuoteCraft.
//!
//! ## Lenient Preview vs Strict Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Calculator preview (pricing.rs)                              │
//! │  ├── Out-of-range dimensions price as zero                             │
//! │  └── Extras missing their own dimensions fall back to a flat price     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commit gate (THIS MODULE)                                    │
//! │  ├── Width and height in 1..=100 000 cm      → InvalidDimension        │
//! │  ├── Computed price must be > 0              → NonPositivePrice        │
//! │  └── Own-dimension extras need usable dims   → MissingDimension        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Quote (quote.rs)                                             │
//! │  └── Re-checks the whole gate before appending                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quotecraft_core::validation::{validate_dimensions, validate_search_query};
//!
//! validate_dimensions(200, 150).unwrap();
//! assert!(validate_dimensions(0, 150).is_err());
//!
//! assert_eq!(validate_search_query("  blind ").unwrap(), "blind");
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::ExtraDimension;
use crate::quote::FeatureDraft;
use crate::types::{ExtraOption, ExtraOptionId, Product};
use crate::MAX_DIMENSION_CM;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Dimension Validators
// =============================================================================

/// Whether a value is an accepted dimension: `1..=MAX_DIMENSION_CM`.
#[inline]
pub fn is_valid_dimension(value: i64) -> bool {
    (1..=MAX_DIMENSION_CM).contains(&value)
}

/// Validates a single dimension in centimetres.
pub fn validate_dimension(field: &str, value: i64) -> CoreResult<()> {
    if !is_valid_dimension(value) {
        return Err(CoreError::invalid_dimension(field, value));
    }
    Ok(())
}

/// Validates a line's width and height (width is checked first).
pub fn validate_dimensions(width: i64, height: i64) -> CoreResult<()> {
    validate_dimension("width", width)?;
    validate_dimension("height", height)
}

/// Finds the first selected extra that needs its own dimensions but has no
/// usable entry.
///
/// Unknown extra ids are skipped, matching the calculator.
pub fn missing_extra_dimensions<'a>(
    product: &'a Product,
    selected_extras: &[ExtraOptionId],
    extra_dimensions: &[ExtraDimension],
) -> Option<&'a ExtraOption> {
    selected_extras
        .iter()
        .filter_map(|id| product.extra(*id))
        .filter(|extra| extra.needs_custom_dimensions())
        .find(|extra| {
            !extra_dimensions
                .iter()
                .any(|d| d.extra_id() == extra.id && d.is_usable())
        })
}

/// The commit-time gate for extras.
///
/// ## Errors
/// `MissingDimension` naming the first extra without usable dimensions.
pub fn check_extra_dimensions(
    product: &Product,
    selected_extras: &[ExtraOptionId],
    extra_dimensions: &[ExtraDimension],
) -> CoreResult<()> {
    match missing_extra_dimensions(product, selected_extras, extra_dimensions) {
        Some(extra) => Err(CoreError::missing_dimension(format!(
            "extra {} ({})",
            extra.id, extra.name
        ))),
        None => Ok(()),
    }
}

/// The full commit gate for a priced line, in order: dimensions, price,
/// extras.
///
/// ## Errors
/// - `InvalidDimension` for a width or height outside `1..=MAX_DIMENSION_CM`
/// - `NonPositivePrice` when the line price is zero or negative
/// - `MissingDimension` from [`check_extra_dimensions`]
pub fn check_line_gate(
    product: &Product,
    width: i64,
    height: i64,
    price: Money,
    selected_extras: &[ExtraOptionId],
    extra_dimensions: &[ExtraDimension],
) -> CoreResult<()> {
    validate_dimensions(width, height)?;

    if !price.is_positive() {
        return Err(CoreError::NonPositivePrice {
            cents: price.cents(),
        });
    }

    check_extra_dimensions(product, selected_extras, extra_dimensions)
}

// =============================================================================
// Custom Feature Validators
// =============================================================================

/// Validates the user-entered part of a custom feature.
///
/// ## Rules
/// - Name must not be blank
/// - Price (flat amount or rate) must be greater than zero
///
/// Dimension checks happen when the price is resolved.
pub fn validate_feature_draft(feature: &FeatureDraft) -> ValidationResult<()> {
    if feature.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "feature name".to_string(),
        });
    }

    if !feature.price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "feature price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a catalog name (product or category) before it is stored.
pub fn validate_catalog_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a catalog price, which may be zero but not negative.
pub fn validate_catalog_price(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
