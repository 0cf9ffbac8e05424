//! # Catalog Types
//!
//! Records supplied by the catalog collaborator. The engine treats them as
//! read-only and trusts their values.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐     ┌──────────────────────────┐                  │
//! │  │    Category     │◄────│         Product          │                  │
//! │  │  ─────────────  │     │  ──────────────────────  │                  │
//! │  │  id             │     │  id, name, description   │                  │
//! │  │  name           │     │  base_price              │                  │
//! │  └─────────────────┘     │  price_per_square_meter  │                  │
//! │                          │  can_export              │                  │
//! │                          └───────┬──────────┬───────┘                  │
//! │                                  │ 1..n     │ 1..n                      │
//! │                    ┌─────────────▼──┐   ┌───▼────────────┐             │
//! │                    │  ExtraOption   │   │  ProductImage  │             │
//! │                    │  price         │   │  image_url     │             │
//! │                    │  per m² flag   │   │  display_order │             │
//! │                    │  own dims flag │   └────────────────┘             │
//! │                    └────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog ids are the integer keys assigned by the catalog store.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Catalog product identifier.
pub type ProductId = i64;

/// Extra option identifier (unique within the catalog).
pub type ExtraOptionId = i64;

/// Category identifier.
pub type CategoryId = i64;

/// User identifier supplied by the identity collaborator.
pub type UserId = i64;

// =============================================================================
// Category
// =============================================================================

/// A product category used for browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

// =============================================================================
// Extra Option
// =============================================================================

/// A priced add-on defined on a product.
///
/// ## Pricing Flags
/// - `price_per_square_meter`: `price` is a rate per m² instead of a flat amount
/// - `use_product_dimensions`: the area comes from the line's own width/height;
///   when false the buyer enters a separate width/height for this extra
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExtraOption {
    pub id: ExtraOptionId,
    pub name: String,
    pub price: Money,
    pub price_per_square_meter: bool,
    #[serde(default)]
    pub use_product_dimensions: bool,
}

impl ExtraOption {
    /// Whether this extra needs its own width/height at selection time.
    #[inline]
    pub fn needs_custom_dimensions(&self) -> bool {
        !self.use_product_dimensions
    }
}

// =============================================================================
// Product Image
// =============================================================================

/// An image attached to a product, shown in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: ProductId,
    pub image_url: String,
    pub display_order: i64,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product that can be quoted at custom dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Display name shown in the calculator and on the exported document.
    pub name: String,

    /// Long description printed under the product name on export.
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pros: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cons: Option<String>,

    pub category_id: CategoryId,

    /// Category display name, joined in by the catalog store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,

    /// Flat price, or a rate per m² when `price_per_square_meter` is set.
    pub base_price: Money,

    pub price_per_square_meter: bool,

    /// Whether lines for this product appear on exported documents.
    /// Records without the flag are exportable.
    #[serde(default = "default_true")]
    pub can_export: bool,

    #[serde(default)]
    pub extras: Vec<ExtraOption>,

    #[serde(default)]
    pub images: Vec<ProductImage>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Looks up one of this product's extras by id.
    pub fn extra(&self, id: ExtraOptionId) -> Option<&ExtraOption> {
        self.extras.iter().find(|e| e.id == id)
    }

    /// Images sorted by their display order.
    pub fn ordered_images(&self) -> Vec<&ProductImage> {
        let mut images: Vec<&ProductImage> = self.images.iter().collect();
        images.sort_by_key(|i| i.display_order);
        images
    }
}

// =============================================================================
// Actor
// =============================================================================

/// The acting user, as supplied by the identity collaborator.
///
/// The engine never authenticates; it only attributes exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
