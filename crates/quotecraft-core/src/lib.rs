//! # quotecraft-core: Pure Quote Engine for QuoteCraft
//!
//! This crate is the **heart** of QuoteCraft. It turns a catalog product, a
//! pair of dimensions, extra selections and custom features into a priced
//! quote line, and keeps an ordered quote of such lines consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       QuoteCraft Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend / quote-desk host                   │   │
//! │  │   Calculator ──► Selected Products ──► Export ──► History       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ quotecraft-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │  │  types  │ │ pricing │ │  quote  │ │ export  │ │ history │  │   │
//! │  │  │ Product │ │ Area    │ │ Quote   │ │Snapshot │ │ Period  │  │   │
//! │  │  │ Extra   │ │ Draft   │ │ Line    │ │Document │ │ Stats   │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 quotecraft-db (Database Layer)                  │   │
//! │  │           Catalog tables, export history, migrations            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog types (Product, ExtraOption, Category, Actor)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Area, line price calculation, custom feature resolution
//! - [`draft`] - The pending line being edited before commit
//! - [`quote`] - Committed quote lines and the quote aggregate
//! - [`export`] - Export snapshots and the document handed to the PDF renderer
//! - [`history`] - Export history period filters and per-user statistics
//! - [`catalog`] - Catalog browsing filters
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and the commit gate
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every price is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Whole Centimetres**: Dimensions are integers, areas are exact cm²
//!
//! ## Example Usage
//!
//! ```rust
//! use quotecraft_core::money::Money;
//! use quotecraft_core::pricing::compute_area;
//!
//! // 200 cm × 150 cm = 3.00 m²
//! let area = compute_area(200, 150).unwrap();
//! assert_eq!(area.to_string(), "3.00 m²");
//!
//! // 50.00 per m² over 3.00 m²
//! let price = Money::from_cents(5000).per_area(area);
//! assert_eq!(price.cents(), 15000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod draft;
pub mod error;
pub mod export;
pub mod history;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::LineDraft;
pub use error::{CoreError, CoreResult, ValidationError};
pub use export::{ExportDraft, ExportRecord, ExportSnapshot, QuoteDocument};
pub use money::Money;
pub use pricing::{Area, ExtraContribution, ExtraDimension, LinePrice};
pub use quote::{CustomFeature, FeatureDraft, Quote, QuoteLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Square centimetres in one square metre.
///
/// Dimensions are entered in centimetres while area-scaled prices are quoted
/// per square metre, so every area conversion divides by this value.
pub const SQUARE_CM_PER_SQUARE_METER: i64 = 10_000;

/// Largest accepted width or height, in centimetres (1 km).
///
/// Bounds every area to 10¹⁰ cm², so `width × height` and area-scaled prices
/// stay within `i64`.
pub const MAX_DIMENSION_CM: i64 = 100_000;
