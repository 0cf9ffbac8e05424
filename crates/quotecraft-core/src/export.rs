//! # Export Snapshot Builder
//!
//! Turns the live quote into immutable, serializable copies: the snapshot
//! persisted to export history and the document handed to the PDF renderer.
//! No pricing happens here, only shape transformation and filtering.
//!
//! ## Export Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Export Flow                                     │
//! │                                                                         │
//! │   Quote (live, mutable)                                                 │
//! │     │                                                                   │
//! │     ├──► build_snapshot() ──► ExportDraft ──► export store ──► Record  │
//! │     │      every line, for audit                    (assigns id)        │
//! │     │                                                                   │
//! │     └──► QuoteDocument::build() ──► PDF renderer                       │
//! │            exportable lines only, numbered 1..n                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both outputs are deep copies. Mutating the quote afterwards never
//! changes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::Area;
use crate::quote::{Quote, QuoteLine};
use crate::types::{Actor, UserId};

// =============================================================================
// Snapshot
// =============================================================================

/// The stored copy of a quote at export time.
///
/// Serialized as `{ selectedProducts, companyName, totalPrice, date }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExportSnapshot {
    pub selected_products: Vec<QuoteLine>,
    pub company_name: String,
    pub total_price: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

/// A snapshot attributed to its exporter, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExportDraft {
    pub user_id: UserId,
    pub username: String,
    pub export_data: ExportSnapshot,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A stored export history entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExportRecord {
    pub id: i64,
    pub user_id: UserId,
    pub username: String,
    pub export_data: ExportSnapshot,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ExportRecord {
    /// Attaches the id assigned by the export store.
    pub fn from_draft(id: i64, draft: ExportDraft) -> Self {
        ExportRecord {
            id,
            user_id: draft.user_id,
            username: draft.username,
            export_data: draft.export_data,
            created_at: draft.created_at,
        }
    }

    pub fn total_price(&self) -> Money {
        self.export_data.total_price
    }
}

/// Builds a snapshot of the quote, stamped with the current time.
pub fn build_snapshot(quote: &Quote, actor: &Actor) -> ExportDraft {
    build_snapshot_at(quote, actor, Utc::now())
}

/// Builds a snapshot of the quote, stamped with `now`.
///
/// Every line is copied, exportable or not.
pub fn build_snapshot_at(quote: &Quote, actor: &Actor, now: DateTime<Utc>) -> ExportDraft {
    ExportDraft {
        user_id: actor.id,
        username: actor.username.clone(),
        export_data: ExportSnapshot {
            selected_products: quote.lines().to_vec(),
            company_name: quote.company_name().to_string(),
            total_price: quote.total_price(),
            date: now,
        },
        created_at: now,
    }
}

// =============================================================================
// Exportable Lines
// =============================================================================

/// Keeps the lines whose product may appear on exported documents, numbered
/// from 1 without gaps.
pub fn filter_exportable(lines: &[QuoteLine]) -> Vec<(usize, &QuoteLine)> {
    lines
        .iter()
        .filter(|line| line.product().can_export)
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .collect()
}

// =============================================================================
// Document
// =============================================================================

/// An extra as printed on the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentExtra {
    pub name: String,
    pub price: Money,
    pub per_square_meter: bool,
    /// e.g. `100 cm × 50 cm = 0.50 m²`, for extras with their own dimensions.
    pub custom_dimensions: Option<String>,
}

/// A custom feature as printed on the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentFeature {
    pub name: String,
    pub price: Money,
    pub dimensions: Option<String>,
}

/// One numbered line of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentLine {
    pub number: usize,
    pub product_name: String,
    pub description: String,
    pub dimensions: String,
    pub extras: Vec<DocumentExtra>,
    pub features: Vec<DocumentFeature>,
    pub price: Money,
}

/// Everything the PDF renderer needs, already priced and filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteDocument {
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,
    pub exported_by: Option<String>,
    pub company_name: Option<String>,
    pub lines: Vec<DocumentLine>,
    /// The quote total, including lines filtered out of the document.
    pub total_price: Money,
    pub file_name: String,
}

impl QuoteDocument {
    /// Builds the document for the current quote.
    pub fn build(quote: &Quote, actor: Option<&Actor>, generated_at: DateTime<Utc>) -> Self {
        let company = quote.company_name().trim();
        let company_name = if company.is_empty() {
            None
        } else {
            Some(company.to_string())
        };

        let lines = filter_exportable(quote.lines())
            .into_iter()
            .map(|(number, line)| document_line(number, line))
            .collect();

        QuoteDocument {
            generated_at,
            exported_by: actor.map(|a| a.username.clone()),
            file_name: document_file_name(company_name.as_deref(), generated_at),
            company_name,
            lines,
            total_price: quote.total_price(),
        }
    }
}

/// `product-calculation-{company-slug-}{YYYY-MM-DD}.pdf`
pub fn document_file_name(company_name: Option<&str>, date: DateTime<Utc>) -> String {
    let slug = company_name
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase())
        .filter(|slug| !slug.is_empty())
        .map(|slug| format!("{}-", slug))
        .unwrap_or_default();

    format!("product-calculation-{}{}.pdf", slug, date.format("%Y-%m-%d"))
}

fn dimension_text(width: i64, height: i64, square_meters: f64) -> String {
    format!("{} cm × {} cm = {:.2} m²", width, height, square_meters)
}

fn document_line(number: usize, line: &QuoteLine) -> DocumentLine {
    let product = line.product();

    let extras = line
        .selected_extras()
        .iter()
        .filter_map(|id| product.extra(*id))
        .map(|extra| DocumentExtra {
            name: extra.name.clone(),
            price: extra.price,
            per_square_meter: extra.price_per_square_meter,
            custom_dimensions: if extra.use_product_dimensions {
                None
            } else {
                line.custom_extra(extra.id)
                    .map(|d| dimension_text(d.width(), d.height(), d.area().square_meters()))
            },
        })
        .collect();

    let features = line
        .custom_features()
        .iter()
        .map(|feature| DocumentFeature {
            name: feature.name().to_string(),
            price: feature.price(),
            dimensions: match (feature.price_per_square_meter(), feature.width(), feature.height()) {
                (true, Some(w), Some(h)) if w > 0 && h > 0 => {
                    Some(dimension_text(w, h, Area::lenient(w, h).square_meters()))
                }
                _ => None,
            },
        })
        .collect();

    DocumentLine {
        number,
        product_name: product.name.clone(),
        description: product.description.clone(),
        dimensions: dimension_text(line.width(), line.height(), line.area().square_meters()),
        extras,
        features,
        price: line.price(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::LineDraft;
    use crate::quote::FeatureDraft;
    use crate::types::{ExtraOption, Product};
    use chrono::TimeZone;

    fn product(id: i64, can_export: bool) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: "Made to measure".to_string(),
            pros: None,
            cons: None,
            category_id: 1,
            category_name: None,
            base_price: Money::from_cents(5_000),
            price_per_square_meter: true,
            can_export,
            extras: vec![ExtraOption {
                id: id * 10,
                name: "Net".to_string(),
                price: Money::from_cents(1_000),
                price_per_square_meter: true,
                use_product_dimensions: false,
            }],
            images: vec![],
        }
    }

    fn quote_with(products: Vec<Product>) -> Quote {
        let mut quote = Quote::new();
        for product in products {
            let mut draft = LineDraft::new(product);
            draft.set_dimensions(200, 100);
            quote.add_line(draft.commit().unwrap()).unwrap();
        }
        quote
    }

    fn actor() -> Actor {
        Actor {
            id: 7,
            username: "maria".to_string(),
            is_admin: false,
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_snapshot_copies_everything() {
        let mut quote = quote_with(vec![product(1, true), product(2, false)]);
        quote.set_company_name("Acme");

        let draft = build_snapshot_at(&quote, &actor(), at());
        assert_eq!(draft.user_id, 7);
        assert_eq!(draft.username, "maria");
        assert_eq!(draft.export_data.selected_products.len(), 2);
        assert_eq!(draft.export_data.total_price.cents(), 20_000);
        assert_eq!(draft.export_data.company_name, "Acme");
        assert_eq!(draft.export_data.date, at());
    }

    #[test]
    fn test_snapshot_is_independent_of_quote() {
        let mut quote = quote_with(vec![product(1, true)]);
        let draft = build_snapshot_at(&quote, &actor(), at());

        quote.clear();
        assert_eq!(draft.export_data.selected_products.len(), 1);
        assert_eq!(draft.export_data.total_price.cents(), 10_000);
    }

    #[test]
    fn test_snapshot_json_layout() {
        let quote = quote_with(vec![product(1, true)]);
        let draft = build_snapshot_at(&quote, &actor(), at());
        let json = serde_json::to_value(&draft.export_data).unwrap();

        assert!(json["selectedProducts"].is_array());
        assert_eq!(json["companyName"], "");
        assert_eq!(json["totalPrice"], 10_000);
        assert_eq!(json["date"], "2024-03-09T14:30:00Z");
    }

    #[test]
    fn test_filter_exportable_renumbers() {
        let quote = quote_with(vec![product(1, false), product(2, true), product(3, false), product(4, true)]);
        let numbered: Vec<(usize, i64)> = filter_exportable(quote.lines())
            .into_iter()
            .map(|(n, line)| (n, line.product().id))
            .collect();
        assert_eq!(numbered, vec![(1, 2), (2, 4)]);
    }

    #[test]
    fn test_document_contents() {
        let mut draft = LineDraft::new(product(1, true));
        draft.set_dimensions(200, 100);
        draft.select_extra(10);
        draft.set_extra_dimensions(10, 100, 50);
        draft
            .add_feature(&FeatureDraft {
                name: "Coating".to_string(),
                price: Money::from_cents(500),
                width: None,
                height: None,
                price_per_square_meter: true,
                use_product_dimensions: true,
            })
            .unwrap();

        let mut quote = Quote::new();
        quote.add_line(draft.commit().unwrap()).unwrap();
        quote.add_line(quote_with(vec![product(2, false)]).lines()[0].clone()).unwrap();
        quote.set_company_name(" Acme  Blinds ");

        let doc = QuoteDocument::build(&quote, Some(&actor()), at());
        assert_eq!(doc.exported_by.as_deref(), Some("maria"));
        assert_eq!(doc.company_name.as_deref(), Some("Acme  Blinds"));
        assert_eq!(doc.file_name, "product-calculation-acme-blinds-2024-03-09.pdf");
        assert_eq!(doc.lines.len(), 1);

        let line = &doc.lines[0];
        assert_eq!(line.number, 1);
        assert_eq!(line.dimensions, "200 cm × 100 cm = 2.00 m²");
        assert_eq!(
            line.extras[0].custom_dimensions.as_deref(),
            Some("100 cm × 50 cm = 0.50 m²")
        );
        assert_eq!(
            line.features[0].dimensions.as_deref(),
            Some("200 cm × 100 cm = 2.00 m²")
        );
        // 100.00 base + 5.00 net + 10.00 coating
        assert_eq!(line.price.cents(), 11_500);
        // The total still includes the non-exportable line
        assert_eq!(doc.total_price.cents(), 21_500);
    }

    #[test]
    fn test_file_name_without_company() {
        assert_eq!(
            document_file_name(None, at()),
            "product-calculation-2024-03-09.pdf"
        );
        assert_eq!(
            document_file_name(Some("   "), at()),
            "product-calculation-2024-03-09.pdf"
        );
    }
}
