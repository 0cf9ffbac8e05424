//! # Export History
//!
//! Period filters and per-user statistics over stored export records.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  records ──► filter_exports(period, now) ──┬──► history table           │
//! │                                            └──► user_stats() ──► totals │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All dates are compared in UTC.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::export::ExportRecord;
use crate::money::Money;

/// Which exports to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "period", rename_all = "camelCase")]
#[ts(export)]
pub enum ExportPeriod {
    #[default]
    All,
    Today,
    /// The last 7 days.
    Week,
    /// The last month.
    Month,
    /// The last 12 months.
    Year,
    /// From the start of `start` to the end of `end` (today when absent).
    Custom {
        #[ts(as = "String")]
        start: NaiveDate,
        #[ts(as = "Option<String>")]
        #[serde(default)]
        end: Option<NaiveDate>,
    },
}

impl ExportPeriod {
    /// Whether an export created at `created_at` falls in this period.
    pub fn contains(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            ExportPeriod::All => true,
            ExportPeriod::Today => created_at.date_naive() == now.date_naive(),
            ExportPeriod::Week => since(now.checked_sub_days(Days::new(7)), created_at),
            ExportPeriod::Month => since(now.checked_sub_months(Months::new(1)), created_at),
            ExportPeriod::Year => since(now.checked_sub_months(Months::new(12)), created_at),
            ExportPeriod::Custom { start, end } => {
                let end = end.unwrap_or_else(|| now.date_naive());
                let day = created_at.date_naive();
                *start <= day && day <= end
            }
        }
    }
}

fn since(cutoff: Option<DateTime<Utc>>, created_at: DateTime<Utc>) -> bool {
    cutoff.map_or(true, |cutoff| created_at >= cutoff)
}

/// Keeps the records created within `period`, preserving their order.
pub fn filter_exports<'a>(
    records: &'a [ExportRecord],
    period: ExportPeriod,
    now: DateTime<Utc>,
) -> Vec<&'a ExportRecord> {
    records
        .iter()
        .filter(|r| period.contains(r.created_at, now))
        .collect()
}

/// Export count and summed totals for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserExportStats {
    pub username: String,
    pub count: usize,
    pub total: Money,
}

/// Groups records by username, in order of first appearance.
pub fn user_stats<'a, I>(records: I) -> Vec<UserExportStats>
where
    I: IntoIterator<Item = &'a ExportRecord>,
{
    let mut stats: Vec<UserExportStats> = Vec::new();

    for record in records {
        match stats.iter_mut().find(|s| s.username == record.username) {
            Some(entry) => {
                entry.count += 1;
                entry.total += record.total_price();
            }
            None => stats.push(UserExportStats {
                username: record.username.clone(),
                count: 1,
                total: record.total_price(),
            }),
        }
    }

    stats
}
