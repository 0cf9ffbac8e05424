//! # Pricing Calculator
//!
//! The single source of pricing truth. Every function here is pure: given
//! the same product, dimensions and selections it returns the same price.
//!
//! ## Line Price Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     compute_line_price()                                │
//! │                                                                         │
//! │  width × height / 10 000 ──► area (m²)                                 │
//! │                                                                         │
//! │  base      = per m² ? area × base_price : base_price                   │
//! │                                                                         │
//! │  + extras  ─┬─ uses product dims ─► per m² ? area × price : price      │
//! │             └─ own dims ──┬─ usable ─► per m² ? own_area × price       │
//! │                           │                    : price                 │
//! │                           └─ missing ─► price (flat fallback)          │
//! │                                                                         │
//! │  + pending custom features (already resolved)                          │
//! │  ─────────────────────────────────────────────                         │
//! │  = line price                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flat fallback keeps the preview price moving while the buyer is still
//! typing. The commit gate in [`crate::validation`] rejects it, so a committed
//! line never carries a fallback contribution.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::quote::{CustomFeature, FeatureDraft};
use crate::types::{ExtraOption, ExtraOptionId, Product};
use crate::validation::{is_valid_dimension, validate_dimensions};
use crate::SQUARE_CM_PER_SQUARE_METER;

// =============================================================================
// Area
// =============================================================================

/// An exact area in square centimetres.
///
/// ## Why Not f64 Square Metres?
/// Dimensions are whole centimetres, so `width × height` is exact in cm².
/// Keeping the integer means area-scaled prices are rounded once, in
/// [`Money::per_area`], instead of compounding float error.
///
/// Serialized as square metres (a JSON number) to match the stored snapshot
/// layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Area(i64);

impl Area {
    /// Creates an area from square centimetres.
    #[inline]
    pub const fn from_square_cm(square_cm: i64) -> Self {
        Area(square_cm)
    }

    /// Zero area.
    #[inline]
    pub const fn zero() -> Self {
        Area(0)
    }

    /// Area of a rectangle, or zero when either side is out of range.
    #[inline]
    pub fn lenient(width: i64, height: i64) -> Self {
        compute_area(width, height).unwrap_or_default()
    }

    /// Returns the exact area in square centimetres.
    #[inline]
    pub const fn square_cm(&self) -> i64 {
        self.0
    }

    /// Returns the area in square metres (for display only).
    #[inline]
    pub fn square_meters(&self) -> f64 {
        self.0 as f64 / SQUARE_CM_PER_SQUARE_METER as f64
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Displays as square metres with two decimals, e.g. `3.00 m²`.
impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m²", self.square_meters())
    }
}

impl Serialize for Area {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.square_meters())
    }
}

impl<'de> Deserialize<'de> for Area {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let square_meters = f64::deserialize(deserializer)?;
        let square_cm = (square_meters * SQUARE_CM_PER_SQUARE_METER as f64).round();
        Ok(Area(square_cm as i64))
    }
}

/// Computes the area of `width × height` centimetres.
///
/// ## Errors
/// `InvalidDimension` when either side is not in `1..=MAX_DIMENSION_CM`.
///
/// ## Example
/// ```rust
/// use quotecraft_core::pricing::compute_area;
///
/// let area = compute_area(200, 150).unwrap();
/// assert_eq!(area.square_meters(), 3.0);
/// assert!(compute_area(0, 150).is_err());
/// assert!(compute_area(4_000_000_000, 4_000_000_000).is_err());
/// ```
pub fn compute_area(width: i64, height: i64) -> CoreResult<Area> {
    validate_dimensions(width, height)?;
    Ok(Area(width * height))
}

// =============================================================================
// Extra Dimensions
// =============================================================================

/// Custom width/height entered for an extra that does not use the product
/// dimensions.
///
/// The area is derived once, on construction. A zero area means the entry is
/// not usable yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExtraDimension {
    extra_id: ExtraOptionId,
    width: i64,
    height: i64,
    #[serde(rename = "squareMeters")]
    #[ts(type = "number")]
    area: Area,
}

impl ExtraDimension {
    /// Creates an entry, deriving its area.
    pub fn new(extra_id: ExtraOptionId, width: i64, height: i64) -> Self {
        ExtraDimension {
            extra_id,
            width,
            height,
            area: Area::lenient(width, height),
        }
    }

    /// An entry with no dimensions yet (created when the extra is selected).
    pub fn empty(extra_id: ExtraOptionId) -> Self {
        ExtraDimension::new(extra_id, 0, 0)
    }

    pub fn extra_id(&self) -> ExtraOptionId {
        self.extra_id
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn area(&self) -> Area {
        self.area
    }

    /// Both sides are accepted dimensions.
    pub fn is_usable(&self) -> bool {
        is_valid_dimension(self.width) && is_valid_dimension(self.height)
    }
}

// =============================================================================
// Line Price
// =============================================================================

/// How one selected extra contributed to a line price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExtraContribution {
    pub extra_id: ExtraOptionId,
    pub amount: Money,
    /// The extra needed its own dimensions but had none, so its flat price
    /// was used.
    pub fallback: bool,
}

/// Result of pricing a line, with the contributions that make it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinePrice {
    pub price: Money,
    #[serde(rename = "squareMeters")]
    #[ts(type = "number")]
    pub area: Area,
    pub base: Money,
    pub extras: Vec<ExtraContribution>,
    pub features: Money,
}

impl LinePrice {
    fn zero() -> Self {
        LinePrice {
            price: Money::zero(),
            area: Area::zero(),
            base: Money::zero(),
            extras: Vec::new(),
            features: Money::zero(),
        }
    }

    /// Whether any extra was priced with the flat fallback.
    pub fn used_fallback(&self) -> bool {
        self.extras.iter().any(|e| e.fallback)
    }
}

/// Prices a line from raw input.
///
/// ## Rules
/// 1. Non-positive width or height → price 0, area 0
/// 2. Base: `area × base_price` when per m², else `base_price`
/// 3. Selected extras, looked up on the product (unknown ids are skipped)
/// 4. Plus every pending custom feature's resolved price
///
/// The returned area is the product's own area, never an extra's.
///
/// ## Example
/// ```rust
/// use quotecraft_core::{Money, Product};
/// use quotecraft_core::pricing::compute_line_price;
///
/// let product = Product {
///     id: 1,
///     name: "Roller blind".into(),
///     description: String::new(),
///     pros: None,
///     cons: None,
///     category_id: 1,
///     category_name: None,
///     base_price: Money::from_cents(5000),
///     price_per_square_meter: true,
///     can_export: true,
///     extras: vec![],
///     images: vec![],
/// };
///
/// let priced = compute_line_price(&product, 200, 100, &[], &[], &[]);
/// assert_eq!(priced.price.cents(), 10000);
/// ```
pub fn compute_line_price(
    product: &Product,
    width: i64,
    height: i64,
    selected_extras: &[ExtraOptionId],
    extra_dimensions: &[ExtraDimension],
    pending_features: &[CustomFeature],
) -> LinePrice {
    let area = match compute_area(width, height) {
        Ok(area) => area,
        Err(_) => return LinePrice::zero(),
    };

    let base = if product.price_per_square_meter {
        product.base_price.per_area(area)
    } else {
        product.base_price
    };

    let extras: Vec<ExtraContribution> = selected_extras
        .iter()
        .filter_map(|id| product.extra(*id))
        .map(|extra| {
            let custom = extra_dimensions.iter().find(|d| d.extra_id == extra.id);
            extra_contribution(extra, area, custom)
        })
        .collect();

    let features: Money = pending_features.iter().map(|f| f.price()).sum();

    let price = base + extras.iter().map(|e| e.amount).sum::<Money>() + features;

    LinePrice {
        price,
        area,
        base,
        extras,
        features,
    }
}

/// Prices one extra against the line area and its optional custom dimensions.
pub fn extra_contribution(
    extra: &ExtraOption,
    line_area: Area,
    custom: Option<&ExtraDimension>,
) -> ExtraContribution {
    let scaled = |area: Area| {
        if extra.price_per_square_meter {
            extra.price.per_area(area)
        } else {
            extra.price
        }
    };

    let (amount, fallback) = if extra.use_product_dimensions {
        (scaled(line_area), false)
    } else {
        match custom {
            Some(dims) if dims.is_usable() => (scaled(dims.area()), false),
            // Flat price regardless of the per-m² flag.
            _ => (extra.price, true),
        }
    };

    ExtraContribution {
        extra_id: extra.id,
        amount,
        fallback,
    }
}

// =============================================================================
// Custom Features
// =============================================================================

/// Resolves the price of a custom feature against a line's dimensions.
///
/// ## Rules
/// - Flat feature: the entered price
/// - Per m² feature: `area × rate`, where the area is the line's
///   `width × height` when the feature reuses the product dimensions, or the
///   feature's own width/height otherwise
///
/// ## Errors
/// - `MissingDimension` when a per-m² feature's required dimensions are
///   absent or not strictly positive
/// - `InvalidDimension` when they exceed `MAX_DIMENSION_CM`
///
/// The result is stored on the feature at creation and never recomputed.
pub fn resolve_feature_price(
    feature: &FeatureDraft,
    line_width: i64,
    line_height: i64,
) -> CoreResult<Money> {
    if !feature.price_per_square_meter {
        return Ok(feature.price);
    }

    let (width, height) = feature_dimensions(feature, line_width, line_height);

    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Ok(feature.price.per_area(compute_area(w, h)?)),
        _ => Err(CoreError::missing_dimension(format!(
            "custom feature '{}'",
            feature.name.trim()
        ))),
    }
}

/// The width/height a feature is measured with: the line's when it reuses
/// the product dimensions, its own otherwise.
pub fn feature_dimensions(
    feature: &FeatureDraft,
    line_width: i64,
    line_height: i64,
) -> (Option<i64>, Option<i64>) {
    if feature.use_product_dimensions {
        (Some(line_width), Some(line_height))
    } else {
        (feature.width, feature.height)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_DIMENSION_CM;

    fn product(base_cents: i64, per_area: bool, extras: Vec<ExtraOption>) -> Product {
        Product {
            id: 1,
            name: "Pergola".to_string(),
            description: String::new(),
            pros: None,
            cons: None,
            category_id: 1,
            category_name: None,
            base_price: Money::from_cents(base_cents),
            price_per_square_meter: per_area,
            can_export: true,
            extras,
            images: Vec::new(),
        }
    }

    fn extra(id: i64, cents: i64, per_area: bool, product_dims: bool) -> ExtraOption {
        ExtraOption {
            id,
            name: format!("Extra {}", id),
            price: Money::from_cents(cents),
            price_per_square_meter: per_area,
            use_product_dimensions: product_dims,
        }
    }

    fn feature(cents: i64, per_area: bool, product_dims: bool) -> FeatureDraft {
        FeatureDraft {
            name: "Custom paint".to_string(),
            price: Money::from_cents(cents),
            width: None,
            height: None,
            price_per_square_meter: per_area,
            use_product_dimensions: product_dims,
        }
    }

    #[test]
    fn test_compute_area() {
        let area = compute_area(200, 150).unwrap();
        assert_eq!(area.square_cm(), 30_000);
        assert_eq!(area.to_string(), "3.00 m²");

        assert_eq!(
            compute_area(0, 150),
            Err(CoreError::invalid_dimension("width", 0))
        );
        assert_eq!(
            compute_area(200, -1),
            Err(CoreError::invalid_dimension("height", -1))
        );
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        assert_eq!(
            compute_area(4_000_000_000, 4_000_000_000),
            Err(CoreError::invalid_dimension("width", 4_000_000_000))
        );
        assert_eq!(
            compute_area(100, MAX_DIMENSION_CM + 1),
            Err(CoreError::invalid_dimension("height", MAX_DIMENSION_CM + 1))
        );

        let largest = compute_area(MAX_DIMENSION_CM, MAX_DIMENSION_CM).unwrap();
        assert_eq!(largest.square_cm(), 10_000_000_000);

        // Same zero result as any other unusable size
        let p = product(5_000, true, vec![]);
        let priced = compute_line_price(&p, 4_000_000_000, 4_000_000_000, &[], &[], &[]);
        assert!(priced.price.is_zero());
        assert!(priced.area.is_zero());
    }

    #[test]
    fn test_oversized_extra_dimensions_fall_back_to_flat() {
        let p = product(5_000, true, vec![extra(7, 1_000, true, false)]);
        let dims = [ExtraDimension::new(7, 4_000_000_000, 4_000_000_000)];
        assert!(!dims[0].is_usable());
        assert!(dims[0].area().is_zero());

        let priced = compute_line_price(&p, 200, 100, &[7], &dims, &[]);
        assert_eq!(priced.price.cents(), 11_000);
        assert!(priced.used_fallback());
    }

    #[test]
    fn test_resolve_feature_with_oversized_dimensions() {
        let mut draft = feature(500, true, false);
        draft.width = Some(4_000_000_000);
        draft.height = Some(4_000_000_000);
        let err = resolve_feature_price(&draft, 200, 100).unwrap_err();
        assert_eq!(err, CoreError::invalid_dimension("width", 4_000_000_000));

        let err = resolve_feature_price(&feature(500, true, true), 200, 4_000_000_000).unwrap_err();
        assert_eq!(err, CoreError::invalid_dimension("height", 4_000_000_000));
    }

    #[test]
    fn test_flat_product_price() {
        // Base 100.00 flat, 50 × 40 cm
        let p = product(10_000, false, vec![]);
        let priced = compute_line_price(&p, 50, 40, &[], &[], &[]);
        assert_eq!(priced.price.cents(), 10_000);
        assert_eq!(priced.area.to_string(), "0.20 m²");
    }

    #[test]
    fn test_area_priced_product() {
        // 50.00/m², 200 × 100 cm = 2.00 m²
        let p = product(5_000, true, vec![]);
        let priced = compute_line_price(&p, 200, 100, &[], &[], &[]);
        assert_eq!(priced.price.cents(), 10_000);
        assert_eq!(priced.base.cents(), 10_000);
    }

    #[test]
    fn test_extra_on_product_dimensions() {
        let p = product(5_000, true, vec![extra(7, 1_000, true, true)]);
        let priced = compute_line_price(&p, 200, 100, &[7], &[], &[]);
        assert_eq!(priced.price.cents(), 12_000);
        assert!(!priced.used_fallback());
    }

    #[test]
    fn test_extra_without_custom_dimensions_falls_back_to_flat() {
        let p = product(5_000, true, vec![extra(7, 1_000, true, false)]);
        let priced = compute_line_price(&p, 200, 100, &[7], &[], &[]);
        assert_eq!(priced.price.cents(), 11_000);
        assert!(priced.used_fallback());

        // An entry with zero dimensions is no better than none.
        let dims = [ExtraDimension::empty(7)];
        let priced = compute_line_price(&p, 200, 100, &[7], &dims, &[]);
        assert_eq!(priced.price.cents(), 11_000);
    }

    #[test]
    fn test_extra_with_custom_dimensions() {
        let p = product(5_000, true, vec![extra(7, 1_000, true, false)]);
        // 100 × 50 cm = 0.50 m² × 10.00 = 5.00
        let dims = [ExtraDimension::new(7, 100, 50)];
        let priced = compute_line_price(&p, 200, 100, &[7], &dims, &[]);
        assert_eq!(priced.price.cents(), 10_500);
        assert_eq!(priced.area.square_cm(), 20_000);
    }

    #[test]
    fn test_flat_extra_ignores_area() {
        let p = product(5_000, true, vec![extra(7, 1_000, false, true)]);
        let priced = compute_line_price(&p, 300, 100, &[7], &[], &[]);
        assert_eq!(priced.price.cents(), 15_000 + 1_000);
    }

    #[test]
    fn test_unknown_extra_is_ignored() {
        let p = product(5_000, true, vec![]);
        let priced = compute_line_price(&p, 200, 100, &[42], &[], &[]);
        assert_eq!(priced.price.cents(), 10_000);
        assert!(priced.extras.is_empty());
    }

    #[test]
    fn test_non_positive_dimensions_price_zero() {
        let p = product(5_000, false, vec![extra(7, 1_000, false, true)]);
        let priced = compute_line_price(&p, 0, 100, &[7], &[], &[]);
        assert!(priced.price.is_zero());
        assert!(priced.area.is_zero());
    }

    #[test]
    fn test_pending_features_are_added() {
        let p = product(10_000, false, vec![]);
        let features = [
            CustomFeature::resolve(1, &feature(250, false, false), 50, 40).unwrap(),
            CustomFeature::resolve(1, &feature(750, false, false), 50, 40).unwrap(),
        ];
        let priced = compute_line_price(&p, 50, 40, &[], &[], &features);
        assert_eq!(priced.features.cents(), 1_000);
        assert_eq!(priced.price.cents(), 11_000);
    }

    #[test]
    fn test_resolve_flat_feature() {
        let price = resolve_feature_price(&feature(1_234, false, false), 0, 0).unwrap();
        assert_eq!(price.cents(), 1_234);
    }

    #[test]
    fn test_resolve_feature_on_product_dimensions() {
        // 5.00/m² on a 2.00 m² line = 10.00
        let price = resolve_feature_price(&feature(500, true, true), 200, 100).unwrap();
        assert_eq!(price.cents(), 1_000);
    }

    #[test]
    fn test_resolve_feature_on_own_dimensions() {
        let mut draft = feature(500, true, false);
        draft.width = Some(100);
        draft.height = Some(100);
        let price = resolve_feature_price(&draft, 200, 100).unwrap();
        assert_eq!(price.cents(), 500);
    }

    #[test]
    fn test_resolve_feature_missing_dimensions() {
        let err = resolve_feature_price(&feature(500, true, false), 200, 100).unwrap_err();
        assert!(matches!(err, CoreError::MissingDimension { .. }));

        let err = resolve_feature_price(&feature(500, true, true), 0, 100).unwrap_err();
        assert!(matches!(err, CoreError::MissingDimension { .. }));
    }

    #[test]
    fn test_area_serializes_as_square_meters() {
        let dims = ExtraDimension::new(3, 120, 50);
        let json = serde_json::to_value(&dims).unwrap();
        assert_eq!(json["extraId"], 3);
        assert_eq!(json["squareMeters"], 0.6);

        let back: ExtraDimension = serde_json::from_value(json).unwrap();
        assert_eq!(back.area().square_cm(), 6_000);
    }
}
