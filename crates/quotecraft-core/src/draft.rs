//! # Line Draft
//!
//! The pending line being edited in the calculator, before it is committed
//! to the quote.
//!
//! Every edit is a named operation. The preview price is recomputed on
//! demand from the current state, and [`LineDraft::commit`] runs the strict
//! gate before producing a [`QuoteLine`].
//!
//! ## Commit Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit()                                                               │
//! │    1. width, height in 1..=100 000        else InvalidDimension        │
//! │    2. computed price > 0                  else NonPositivePrice        │
//! │    3. own-dimension extras have dims      else MissingDimension        │
//! │    4. QuoteLine { price = preview price, features = pending features } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Changing the product means starting a new draft.

use crate::error::CoreResult;
use crate::pricing::{compute_line_price, ExtraDimension, LinePrice};
use crate::quote::{CustomFeature, FeatureDraft, QuoteLine};
use crate::types::{ExtraOptionId, Product};
use crate::validation::check_line_gate;

/// A line under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDraft {
    product: Product,
    width: i64,
    height: i64,
    selected_extras: Vec<ExtraOptionId>,
    extra_dimensions: Vec<ExtraDimension>,
    features: Vec<CustomFeature>,
}

impl LineDraft {
    /// Starts an empty draft for a product.
    pub fn new(product: Product) -> Self {
        LineDraft {
            product,
            width: 0,
            height: 0,
            selected_extras: Vec::new(),
            extra_dimensions: Vec::new(),
            features: Vec::new(),
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

    pub fn selected_extras(&self) -> &[ExtraOptionId] {
        &self.selected_extras
    }

    pub fn extra_dimensions(&self) -> &[ExtraDimension] {
        &self.extra_dimensions
    }

    pub fn features(&self) -> &[CustomFeature] {
        &self.features
    }

    /// Sets the line's width and height in centimetres.
    ///
    /// Features already added keep the price they were resolved with.
    pub fn set_dimensions(&mut self, width: i64, height: i64) {
        self.width = width;
        self.height = height;
    }

    /// Selects one of the product's extras.
    ///
    /// An extra that needs its own dimensions gets an empty entry to fill in.
    ///
    /// ## Returns
    /// `false` when the id is unknown or already selected.
    pub fn select_extra(&mut self, extra_id: ExtraOptionId) -> bool {
        let needs_dimensions = match self.product.extra(extra_id) {
            Some(extra) => extra.needs_custom_dimensions(),
            None => return false,
        };
        if self.selected_extras.contains(&extra_id) {
            return false;
        }

        self.selected_extras.push(extra_id);
        if needs_dimensions && self.dimension_entry(extra_id).is_none() {
            self.extra_dimensions.push(ExtraDimension::empty(extra_id));
        }
        true
    }

    /// Deselects an extra and drops its custom dimensions.
    pub fn deselect_extra(&mut self, extra_id: ExtraOptionId) -> bool {
        let before = self.selected_extras.len();
        self.selected_extras.retain(|id| *id != extra_id);
        self.extra_dimensions.retain(|d| d.extra_id() != extra_id);
        self.selected_extras.len() != before
    }

    /// Sets the custom width/height for an extra, replacing any earlier entry.
    pub fn set_extra_dimensions(&mut self, extra_id: ExtraOptionId, width: i64, height: i64) {
        let entry = ExtraDimension::new(extra_id, width, height);
        match self.dimension_entry(extra_id) {
            Some(index) => self.extra_dimensions[index] = entry,
            None => self.extra_dimensions.push(entry),
        }
    }

    /// Resolves a custom feature against the draft's current dimensions and
    /// keeps it pending until commit.
    ///
    /// ## Errors
    /// - `Validation` for a blank name or a non-positive price
    /// - `MissingDimension` for a per-m² feature without usable dimensions
    pub fn add_feature(&mut self, draft: &FeatureDraft) -> CoreResult<&CustomFeature> {
        let feature = CustomFeature::resolve(self.product.id, draft, self.width, self.height)?;
        let index = self.features.len();
        self.features.push(feature);
        Ok(&self.features[index])
    }

    /// Removes a pending feature. Unknown ids are ignored.
    pub fn remove_feature(&mut self, feature_id: &str) -> Option<CustomFeature> {
        let position = self.features.iter().position(|f| f.id() == feature_id)?;
        Some(self.features.remove(position))
    }

    /// Preview price, with the lenient fallback for incomplete extras.
    pub fn price(&self) -> LinePrice {
        compute_line_price(
            &self.product,
            self.width,
            self.height,
            &self.selected_extras,
            &self.extra_dimensions,
            &self.features,
        )
    }

    /// Runs the commit gate and produces a priced line.
    ///
    /// The draft is left as is, so a failed commit can be corrected and
    /// retried.
    pub fn commit(&self) -> CoreResult<QuoteLine> {
        let priced = self.price();
        check_line_gate(
            &self.product,
            self.width,
            self.height,
            priced.price,
            &self.selected_extras,
            &self.extra_dimensions,
        )?;

        // Only entries for extras that are still selected travel with the line.
        let custom_extras = self
            .extra_dimensions
            .iter()
            .filter(|d| self.selected_extras.contains(&d.extra_id()))
            .cloned()
            .collect();

        Ok(QuoteLine::priced(
            self.product.clone(),
            self.width,
            self.height,
            priced.area,
            self.selected_extras.clone(),
            custom_extras,
            priced.price,
            self.features.clone(),
        ))
    }

    fn dimension_entry(&self, extra_id: ExtraOptionId) -> Option<usize> {
        self.extra_dimensions
            .iter()
            .position(|d| d.extra_id() == extra_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
