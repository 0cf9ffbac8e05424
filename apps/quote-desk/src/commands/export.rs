//! # Export Commands
//!
//! ## Export Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  export_quote                                                           │
//! │       │                                                                 │
//! │       ├── lock quote ──► build_snapshot() + QuoteDocument::build()     │
//! │       │                  (both deep copies, lock released)             │
//! │       │                                                                 │
//! │       ├── exports().save(draft) ──► ExportRecord { id, ... }           │
//! │       │                                                                 │
//! │       └── respond { record, document } ──► PDF renderer                │
//! │                                                                         │
//! │  The live quote is left as it was.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use quotecraft_core::export::build_snapshot_at;
use quotecraft_core::history::{filter_exports, user_stats, ExportPeriod, UserExportStats};
use quotecraft_core::{ExportRecord, Money, QuoteDocument};

use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, DbState, QuoteState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub record: ExportRecord,
    pub document: QuoteDocument,
    pub formatted_total: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportListResponse {
    pub exports: Vec<ExportRecord>,
    pub stats: Vec<UserExportStats>,
    pub total: Money,
    /// Whether the list spans every user (admins) or only the caller.
    pub all_users: bool,
}

/// Stores a snapshot of the quote and returns it with the document to render.
pub async fn export_quote(
    db: &DbState,
    quote: &QuoteState,
    config: &ConfigState,
) -> Result<ExportResponse, ApiError> {
    debug!("export_quote command");

    let actor = quote.actor();
    let now = Utc::now();

    let (draft, document) = quote.with_quote(|q| {
        if q.is_empty() {
            return Err(ApiError::new(ErrorCode::QuoteError, "Quote has no lines to export"));
        }
        Ok((build_snapshot_at(q, actor, now), QuoteDocument::build(q, Some(actor), now)))
    })?;

    let record = db.inner().exports().save(&draft).await?;

    info!(
        export_id = record.id,
        user = %actor.username,
        lines = record.export_data.selected_products.len(),
        printed = document.lines.len(),
        "Quote exported"
    );

    Ok(ExportResponse {
        formatted_total: config.format_currency(record.total_price()),
        record,
        document,
    })
}

/// Lists export history for the period with per-user statistics.
///
/// Admins see every user's exports, everyone else only their own.
pub async fn list_exports(
    db: &DbState,
    quote: &QuoteState,
    period: ExportPeriod,
) -> Result<ExportListResponse, ApiError> {
    let actor = quote.actor();
    debug!(user = %actor.username, ?period, "list_exports command");

    let records = if actor.is_admin {
        db.inner().exports().list_all().await?
    } else {
        db.inner().exports().list_for_user(actor.id).await?
    };

    let exports: Vec<ExportRecord> = filter_exports(&records, period, Utc::now())
        .into_iter()
        .cloned()
        .collect();
    let stats = user_stats(&exports);
    let total = exports.iter().map(|r| r.total_price()).sum();

    Ok(ExportListResponse {
        exports,
        stats,
        total,
        all_users: actor.is_admin,
    })
}
