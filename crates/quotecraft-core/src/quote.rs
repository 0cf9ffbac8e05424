//! # Quote Cart
//!
//! Owns the ordered collection of committed lines and keeps the total
//! consistent with them.
//!
//! ## Quote Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quote Operations                                     │
//! │                                                                         │
//! │  User Action              Operation                  State Change       │
//! │  ───────────              ─────────                  ────────────       │
//! │                                                                         │
//! │  Add to selection ──────► add_line() ──────────────► lines.push(line)  │
//! │                                                                         │
//! │  Arrow up / down ───────► move_up() / move_down() ─► swap neighbours   │
//! │                                                                         │
//! │  Add custom feature ────► add_feature_to_line() ───► line.price += f   │
//! │                                                                         │
//! │  Remove feature ────────► remove_feature_from_line() line.price -= f   │
//! │                                                                         │
//! │  Remove line ───────────► remove_line() ───────────► lines.remove(i)   │
//! │                                                                         │
//! │  total_price() ─────────► Σ line.price (derived, never stored)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Lifecycle
//! A line is created fully priced by [`crate::draft::LineDraft::commit`]. Its
//! dimensions and extras never change afterwards; only custom features are
//! attached or detached, each moving the price by exactly the feature's
//! resolved amount. Every failing operation leaves the quote untouched.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{
    compute_line_price, feature_dimensions, resolve_feature_price, Area, ExtraDimension,
};
use crate::types::{ExtraOptionId, Product, ProductId};
use crate::validation::{check_line_gate, validate_feature_draft};

// =============================================================================
// Custom Features
// =============================================================================

/// User input for a custom feature, before its price is resolved.
///
/// `price` is a flat amount, or a rate per m² when `price_per_square_meter`
/// is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FeatureDraft {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default, rename = "isPricePerSquareMeter")]
    pub price_per_square_meter: bool,
    #[serde(default)]
    pub use_product_dimensions: bool,
}

/// A user-defined add-on attached to one line.
///
/// ## Frozen Price
/// `price` is resolved once, when the feature is created, and is never
/// recomputed. `width`/`height` record the dimensions it was measured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomFeature {
    id: String,
    product_id: ProductId,
    name: String,
    /// The amount as entered (flat price or rate per m²).
    rate: Money,
    /// Resolved contribution to the line price.
    price: Money,
    width: Option<i64>,
    height: Option<i64>,
    #[serde(rename = "isPricePerSquareMeter")]
    price_per_square_meter: bool,
    use_product_dimensions: bool,
}

impl CustomFeature {
    /// Validates and prices a feature against a line's dimensions, assigning
    /// it a fresh identity.
    ///
    /// ## Errors
    /// - `Validation` for a blank name or a non-positive price
    /// - `MissingDimension` for a per-m² feature without usable dimensions
    pub fn resolve(
        product_id: ProductId,
        draft: &FeatureDraft,
        line_width: i64,
        line_height: i64,
    ) -> CoreResult<Self> {
        validate_feature_draft(draft)?;
        let price = resolve_feature_price(draft, line_width, line_height)?;
        let (width, height) = feature_dimensions(draft, line_width, line_height);

        Ok(CustomFeature {
            id: Uuid::new_v4().to_string(),
            product_id,
            name: draft.name.trim().to_string(),
            rate: draft.price,
            price,
            width,
            height,
            price_per_square_meter: draft.price_per_square_meter,
            use_product_dimensions: draft.use_product_dimensions,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rate(&self) -> Money {
        self.rate
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn width(&self) -> Option<i64> {
        self.width
    }

    pub fn height(&self) -> Option<i64> {
        self.height
    }

    pub fn price_per_square_meter(&self) -> bool {
        self.price_per_square_meter
    }

    pub fn use_product_dimensions(&self) -> bool {
        self.use_product_dimensions
    }
}

// =============================================================================
// Quote Line
// =============================================================================

/// A committed, priced product selection.
///
/// Serialized with the field names of the stored export snapshot
/// (`product`, `width`, `height`, `squareMeters`, `selectedExtras`,
/// `customExtras`, `price`, `customFeatures`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteLine {
    product: Product,
    width: i64,
    height: i64,
    #[serde(rename = "squareMeters")]
    #[ts(type = "number")]
    area: Area,
    selected_extras: Vec<ExtraOptionId>,
    #[serde(default)]
    custom_extras: Vec<ExtraDimension>,
    price: Money,
    #[serde(default)]
    custom_features: Vec<CustomFeature>,
}

impl QuoteLine {
    /// Assembles a line whose price was already computed by the calculator.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn priced(
        product: Product,
        width: i64,
        height: i64,
        area: Area,
        selected_extras: Vec<ExtraOptionId>,
        custom_extras: Vec<ExtraDimension>,
        price: Money,
        custom_features: Vec<CustomFeature>,
    ) -> Self {
        QuoteLine {
            product,
            width,
            height,
            area,
            selected_extras,
            custom_extras,
            price,
            custom_features,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
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

    pub fn selected_extras(&self) -> &[ExtraOptionId] {
        &self.selected_extras
    }

    pub fn custom_extras(&self) -> &[ExtraDimension] {
        &self.custom_extras
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn custom_features(&self) -> &[CustomFeature] {
        &self.custom_features
    }

    /// Custom dimensions entered for one of the selected extras.
    pub fn custom_extra(&self, extra_id: ExtraOptionId) -> Option<&ExtraDimension> {
        self.custom_extras.iter().find(|d| d.extra_id() == extra_id)
    }

    /// Prices this line again from its stored inputs.
    ///
    /// Always equals [`QuoteLine::price`]; used to check for drift.
    pub fn recompute_price(&self) -> Money {
        compute_line_price(
            &self.product,
            self.width,
            self.height,
            &self.selected_extras,
            &self.custom_extras,
            &self.custom_features,
        )
        .price
    }

    fn attach_feature(&mut self, feature: CustomFeature) -> &CustomFeature {
        self.price += feature.price;
        let index = self.custom_features.len();
        self.custom_features.push(feature);
        &self.custom_features[index]
    }

    fn detach_feature(&mut self, feature_id: &str) -> Option<CustomFeature> {
        let position = self.custom_features.iter().position(|f| f.id == feature_id)?;
        let feature = self.custom_features.remove(position);
        self.price -= feature.price;
        Some(feature)
    }
}

// =============================================================================
// Quote
// =============================================================================

/// The ordered quote of committed lines.
///
/// ## Invariants
/// - `total_price()` is the sum of line prices, computed on every call
/// - Line order is the presentation and export order
/// - Only the owning session mutates a quote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    lines: Vec<QuoteLine>,
    company_name: String,
}

impl Quote {
    /// Creates an empty quote.
    pub fn new() -> Self {
        Quote::default()
    }

    pub fn lines(&self) -> &[QuoteLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&QuoteLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// Sum of all line prices.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(|l| l.price).sum()
    }

    /// Appends a committed line.
    ///
    /// Runs the commit gate again, since a line can also arrive deserialized.
    ///
    /// ## Errors
    /// - `InvalidDimension` when the line's width or height is out of range
    /// - `NonPositivePrice` when the line price is not above zero
    /// - `MissingDimension` when a selected extra that needs its own
    ///   dimensions has none
    ///
    /// The line is not appended on error.
    pub fn add_line(&mut self, line: QuoteLine) -> CoreResult<()> {
        check_line_gate(
            &line.product,
            line.width,
            line.height,
            line.price,
            &line.selected_extras,
            &line.custom_extras,
        )?;
        self.lines.push(line);
        Ok(())
    }

    /// Removes and returns the line at `index`.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<QuoteLine> {
        self.check_index(index)?;
        Ok(self.lines.remove(index))
    }

    /// Swaps the line at `index` with the one above it.
    ///
    /// ## Returns
    /// `false` (and no change) when the line is already first or does not
    /// exist.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.lines.len() {
            return false;
        }
        self.lines.swap(index, index - 1);
        true
    }

    /// Swaps the line at `index` with the one below it.
    ///
    /// ## Returns
    /// `false` (and no change) when the line is already last or does not
    /// exist.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index.saturating_add(1) >= self.lines.len() {
            return false;
        }
        self.lines.swap(index, index + 1);
        true
    }

    /// Resolves a custom feature against the line's committed dimensions and
    /// attaches it.
    ///
    /// ## Errors
    /// - `IndexOutOfRange` when the line does not exist
    /// - `Validation` / `MissingDimension` from resolving the feature
    pub fn add_feature_to_line(
        &mut self,
        line_index: usize,
        draft: &FeatureDraft,
    ) -> CoreResult<&CustomFeature> {
        self.check_index(line_index)?;
        let line = &mut self.lines[line_index];
        let feature = CustomFeature::resolve(line.product.id, draft, line.width, line.height)?;
        Ok(line.attach_feature(feature))
    }

    /// Detaches a custom feature from a line.
    ///
    /// ## Returns
    /// The removed feature, or `None` when the line has no such feature.
    ///
    /// ## Errors
    /// `IndexOutOfRange` when the line does not exist.
    pub fn remove_feature_from_line(
        &mut self,
        line_index: usize,
        feature_id: &str,
    ) -> CoreResult<Option<CustomFeature>> {
        self.check_index(line_index)?;
        Ok(self.lines[line_index].detach_feature(feature_id))
    }

    /// Replaces the company name as given.
    pub fn set_company_name(&mut self, name: impl Into<String>) {
        self.company_name = name.into();
    }

    /// Empties the quote and resets the company name.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.company_name.clear();
    }

    fn check_index(&self, index: usize) -> CoreResult<()> {
        if index >= self.lines.len() {
            return Err(CoreError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
