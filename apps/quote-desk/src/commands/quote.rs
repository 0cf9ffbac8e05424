//! # Quote Commands
//!
//! Pricing a pending line and editing the session's quote.
//!
//! ## Quote Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   price_line ──► (preview only, nothing stored)                        │
//! │                                                                         │
//! │   add_line ──► LineDraft::commit() ──► Quote::add_line()               │
//! │                    │                                                    │
//! │                    └── InvalidDimension / NonPositivePrice /            │
//! │                        MissingDimension: quote untouched                │
//! │                                                                         │
//! │   remove_line, move_line_up/down, add_feature, remove_feature,          │
//! │   set_company_name ──► Quote (total re-derived on every read)           │
//! │                                                                         │
//! │   clear_quote ──► empty quote                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A line request carries the whole calculator form, so the draft is rebuilt
//! per request and no draft state lives between commands.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use quotecraft_core::{
    CustomFeature, ExtraOptionId, FeatureDraft, LineDraft, LinePrice, Money, Product, ProductId,
    Quote, QuoteLine,
};

use crate::commands::catalog::load_product;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, QuoteState};

// =============================================================================
// Arguments
// =============================================================================

/// Custom width/height for an extra that does not use the line dimensions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraDimensionArgs {
    pub extra_id: ExtraOptionId,
    pub width: i64,
    pub height: i64,
}

/// The calculator form for one line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineArgs {
    pub product_id: ProductId,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub selected_extras: Vec<ExtraOptionId>,
    #[serde(default)]
    pub extra_dimensions: Vec<ExtraDimensionArgs>,
    #[serde(default)]
    pub features: Vec<FeatureDraft>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineIndexArgs {
    pub index: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFeatureArgs {
    pub line_index: usize,
    pub feature: FeatureDraft,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFeatureArgs {
    pub line_index: usize,
    pub feature_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyNameArgs {
    pub company_name: String,
}

// =============================================================================
// Responses
// =============================================================================

/// The quote as the frontend shows it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub lines: Vec<QuoteLine>,
    pub company_name: String,
    pub total_price: Money,
    pub formatted_total: String,
}

impl QuoteResponse {
    pub fn new(quote: &Quote, config: &ConfigState) -> Self {
        let total_price = quote.total_price();
        QuoteResponse {
            lines: quote.lines().to_vec(),
            company_name: quote.company_name().to_string(),
            total_price,
            formatted_total: config.format_currency(total_price),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    /// False at the boundary or for an unknown index.
    pub moved: bool,
    pub quote: QuoteResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFeatureResponse {
    pub feature: CustomFeature,
    pub quote: QuoteResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFeatureResponse {
    pub removed: bool,
    pub quote: QuoteResponse,
}

// =============================================================================
// Draft
// =============================================================================

/// Replays the calculator form onto a fresh draft.
///
/// Dimensions for extras that are not selected are ignored.
fn build_draft(product: Product, args: &LineArgs) -> Result<LineDraft, ApiError> {
    let mut draft = LineDraft::new(product);
    draft.set_dimensions(args.width, args.height);

    for extra_id in &args.selected_extras {
        if draft.product().extra(*extra_id).is_none() {
            return Err(ApiError::validation(format!(
                "Product {} has no extra {}",
                draft.product().id,
                extra_id
            )));
        }
        draft.select_extra(*extra_id);
    }

    for dims in &args.extra_dimensions {
        if draft.selected_extras().contains(&dims.extra_id) {
            draft.set_extra_dimensions(dims.extra_id, dims.width, dims.height);
        }
    }

    for feature in &args.features {
        draft.add_feature(feature)?;
    }

    Ok(draft)
}

// =============================================================================
// Commands
// =============================================================================

/// Prices a pending line without storing anything.
///
/// Extras still missing their own dimensions are priced at their flat price
/// and flagged with `fallback`; `add_line` would reject them.
pub async fn price_line(db: &DbState, args: LineArgs) -> Result<LinePrice, ApiError> {
    debug!(product_id = args.product_id, width = args.width, height = args.height, "price_line command");

    let product = load_product(db, args.product_id).await?;
    let draft = build_draft(product, &args)?;
    Ok(draft.price())
}

/// Commits a line and appends it to the quote.
pub async fn add_line(
    db: &DbState,
    quote: &QuoteState,
    config: &ConfigState,
    args: LineArgs,
) -> Result<QuoteResponse, ApiError> {
    debug!(product_id = args.product_id, width = args.width, height = args.height, "add_line command");

    let product = load_product(db, args.product_id).await?;
    let line = build_draft(product, &args)?.commit()?;
    let price = line.price();

    let response = quote.with_quote_mut(|q| {
        q.add_line(line)?;
        Ok::<QuoteResponse, ApiError>(QuoteResponse::new(q, config))
    })?;

    info!(
        product_id = args.product_id,
        price = %price,
        lines = response.lines.len(),
        "Line added to quote"
    );
    Ok(response)
}

/// Removes a line.
pub fn remove_line(
    quote: &QuoteState,
    config: &ConfigState,
    args: LineIndexArgs,
) -> Result<QuoteResponse, ApiError> {
    debug!(index = args.index, "remove_line command");

    quote.with_quote_mut(|q| {
        q.remove_line(args.index)?;
        Ok(QuoteResponse::new(q, config))
    })
}

/// Swaps a line with the one above it.
pub fn move_line_up(quote: &QuoteState, config: &ConfigState, args: LineIndexArgs) -> MoveResponse {
    debug!(index = args.index, "move_line_up command");

    quote.with_quote_mut(|q| MoveResponse {
        moved: q.move_up(args.index),
        quote: QuoteResponse::new(q, config),
    })
}

/// Swaps a line with the one below it.
pub fn move_line_down(
    quote: &QuoteState,
    config: &ConfigState,
    args: LineIndexArgs,
) -> MoveResponse {
    debug!(index = args.index, "move_line_down command");

    quote.with_quote_mut(|q| MoveResponse {
        moved: q.move_down(args.index),
        quote: QuoteResponse::new(q, config),
    })
}

/// Attaches a custom feature to a committed line.
pub fn add_feature(
    quote: &QuoteState,
    config: &ConfigState,
    args: AddFeatureArgs,
) -> Result<AddFeatureResponse, ApiError> {
    debug!(line_index = args.line_index, name = %args.feature.name, "add_feature command");

    quote.with_quote_mut(|q| {
        let feature = q.add_feature_to_line(args.line_index, &args.feature)?.clone();
        Ok(AddFeatureResponse {
            feature,
            quote: QuoteResponse::new(q, config),
        })
    })
}

/// Detaches a custom feature. Unknown feature ids are a no-op.
pub fn remove_feature(
    quote: &QuoteState,
    config: &ConfigState,
    args: RemoveFeatureArgs,
) -> Result<RemoveFeatureResponse, ApiError> {
    debug!(line_index = args.line_index, feature_id = %args.feature_id, "remove_feature command");

    quote.with_quote_mut(|q| {
        let removed = q
            .remove_feature_from_line(args.line_index, &args.feature_id)?
            .is_some();
        Ok(RemoveFeatureResponse {
            removed,
            quote: QuoteResponse::new(q, config),
        })
    })
}

/// Sets the company name printed on the export.
pub fn set_company_name(
    quote: &QuoteState,
    config: &ConfigState,
    args: CompanyNameArgs,
) -> QuoteResponse {
    debug!("set_company_name command");

    quote.with_quote_mut(|q| {
        q.set_company_name(args.company_name);
        QuoteResponse::new(q, config)
    })
}

/// Empties the quote.
pub fn clear_quote(quote: &QuoteState, config: &ConfigState) -> QuoteResponse {
    debug!("clear_quote command");

    quote.with_quote_mut(|q| {
        q.clear();
        QuoteResponse::new(q, config)
    })
}

pub fn get_quote(quote: &QuoteState, config: &ConfigState) -> QuoteResponse {
    quote.with_quote(|q| QuoteResponse::new(q, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{seeded_app, Seeded};
    use crate::error::ErrorCode;

    fn window_args(seeded: &Seeded, extras: Vec<ExtraOptionId>) -> LineArgs {
        LineArgs {
            product_id: seeded.window.id,
            width: 200,
            height: 100,
            selected_extras: extras,
            extra_dimensions: vec![],
            features: vec![],
        }
    }

    fn blind_args(seeded: &Seeded) -> LineArgs {
        LineArgs {
            product_id: seeded.blind.id,
            width: 200,
            height: 100,
            selected_extras: vec![],
            extra_dimensions: vec![],
            features: vec![],
        }
    }

    fn per_area_feature(rate_cents: i64) -> FeatureDraft {
        FeatureDraft {
            name: "Coating".to_string(),
            price: Money::from_cents(rate_cents),
            width: None,
            height: None,
            price_per_square_meter: true,
            use_product_dimensions: true,
        }
    }

    #[tokio::test]
    async fn test_price_line_preview() {
        let seeded = seeded_app().await;
        let app = &seeded.app;

        // 2.00 m² at 50.00/m², plus tinted glass at 10.00/m²
        let priced = price_line(&app.db, window_args(&seeded, vec![seeded.tinted]))
            .await
            .unwrap();
        assert_eq!(priced.price.cents(), 12_000);
        assert_eq!(priced.area.square_cm(), 20_000);

        // The net has no dimensions yet: flat price, flagged
        let priced = price_line(&app.db, window_args(&seeded, vec![seeded.net]))
            .await
            .unwrap();
        assert_eq!(priced.price.cents(), 11_000);
        assert!(priced.extras[0].fallback);
        assert!(app.quote.with_quote(|q| q.is_empty()));
    }

    #[tokio::test]
    async fn test_add_line_gates() {
        let seeded = seeded_app().await;
        let app = &seeded.app;

        let err = add_line(&app.db, &app.quote, &app.config, window_args(&seeded, vec![seeded.net]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingDimensions);

        let mut args = window_args(&seeded, vec![]);
        args.width = 0;
        let err = add_line(&app.db, &app.quote, &app.config, args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_line(&app.db, &app.quote, &app.config, window_args(&seeded, vec![9_999]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(app.quote.with_quote(|q| q.is_empty()));
    }

    #[tokio::test]
    async fn test_oversized_dimensions_are_answered() {
        let seeded = seeded_app().await;
        let app = &seeded.app;

        let mut args = window_args(&seeded, vec![]);
        args.width = 4_000_000_000;
        args.height = 4_000_000_000;

        let priced = price_line(&app.db, args.clone()).await.unwrap();
        assert!(priced.price.is_zero());

        let err = add_line(&app.db, &app.quote, &app.config, args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // An oversized net is treated as not entered
        let mut args = window_args(&seeded, vec![seeded.net]);
        args.extra_dimensions = vec![ExtraDimensionArgs {
            extra_id: seeded.net,
            width: 4_000_000_000,
            height: 4_000_000_000,
        }];
        let priced = price_line(&app.db, args.clone()).await.unwrap();
        assert_eq!(priced.price.cents(), 11_000);
        let err = add_line(&app.db, &app.quote, &app.config, args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingDimensions);

        assert!(app.quote.with_quote(|q| q.is_empty()));
    }

    #[tokio::test]
    async fn test_add_line_with_extra_dimensions() {
        let seeded = seeded_app().await;
        let app = &seeded.app;

        let mut args = window_args(&seeded, vec![seeded.net]);
        args.extra_dimensions = vec![ExtraDimensionArgs {
            extra_id: seeded.net,
            width: 100,
            height: 50,
        }];

        let quote = add_line(&app.db, &app.quote, &app.config, args).await.unwrap();
        // 100.00 + 0.50 m² × 10.00
        assert_eq!(quote.total_price.cents(), 10_500);
        assert_eq!(quote.formatted_total, "€105.00");
        assert_eq!(quote.lines[0].custom_extras().len(), 1);
    }

    #[tokio::test]
    async fn test_quote_editing_flow() {
        let seeded = seeded_app().await;
        let app = &seeded.app;

        add_line(&app.db, &app.quote, &app.config, window_args(&seeded, vec![seeded.tinted]))
            .await
            .unwrap();
        let quote = add_line(&app.db, &app.quote, &app.config, blind_args(&seeded))
            .await
            .unwrap();
        assert_eq!(quote.total_price.cents(), 22_000);

        let moved = move_line_down(&app.quote, &app.config, LineIndexArgs { index: 0 });
        assert!(moved.moved);
        assert_eq!(moved.quote.lines[0].product().id, seeded.blind.id);

        let boundary = move_line_down(&app.quote, &app.config, LineIndexArgs { index: 1 });
        assert!(!boundary.moved);
        let boundary = move_line_up(&app.quote, &app.config, LineIndexArgs { index: 0 });
        assert!(!boundary.moved);

        // Rate 5.00/m² on the blind's 2.00 m²
        let added = add_feature(
            &app.quote,
            &app.config,
            AddFeatureArgs {
                line_index: 0,
                feature: per_area_feature(500),
            },
        )
        .unwrap();
        assert_eq!(added.feature.price().cents(), 1_000);
        assert_eq!(added.quote.total_price.cents(), 23_000);

        let removed = remove_feature(
            &app.quote,
            &app.config,
            RemoveFeatureArgs {
                line_index: 0,
                feature_id: added.feature.id().to_string(),
            },
        )
        .unwrap();
        assert!(removed.removed);
        assert_eq!(removed.quote.total_price.cents(), 22_000);

        let again = remove_feature(
            &app.quote,
            &app.config,
            RemoveFeatureArgs {
                line_index: 0,
                feature_id: added.feature.id().to_string(),
            },
        )
        .unwrap();
        assert!(!again.removed);

        let err = remove_line(&app.quote, &app.config, LineIndexArgs { index: 5 }).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let quote = remove_line(&app.quote, &app.config, LineIndexArgs { index: 0 }).unwrap();
        assert_eq!(quote.total_price.cents(), 12_000);

        let quote = set_company_name(
            &app.quote,
            &app.config,
            CompanyNameArgs {
                company_name: "Acme".to_string(),
            },
        );
        assert_eq!(quote.company_name, "Acme");

        let quote = clear_quote(&app.quote, &app.config);
        assert!(quote.lines.is_empty());
        assert_eq!(quote.company_name, "");
        assert!(get_quote(&app.quote, &app.config).total_price.is_zero());
    }

    #[tokio::test]
    async fn test_add_feature_rejects_invalid_input() {
        let seeded = seeded_app().await;
        let app = &seeded.app;

        let err = add_feature(
            &app.quote,
            &app.config,
            AddFeatureArgs {
                line_index: 0,
                feature: per_area_feature(500),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        add_line(&app.db, &app.quote, &app.config, blind_args(&seeded))
            .await
            .unwrap();
        let err = add_feature(
            &app.quote,
            &app.config,
            AddFeatureArgs {
                line_index: 0,
                feature: per_area_feature(0),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_quote(&app.quote, &app.config).total_price.cents(), 10_000);
    }
}
