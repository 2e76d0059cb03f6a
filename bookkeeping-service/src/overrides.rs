//! Override resolution for sales totals.
//!
//! A month shows its stored override where one exists, field by field. A
//! quarter first builds its baseline from the three months (override or daily
//! entries), then a quarterly override with positive sales replaces it whole.

use crate::aggregation::SalesTotals;
use crate::models::SalesOverride;
use crate::period::Month;
use serde::Serialize;
use std::collections::HashMap;

/// Where a displayed sales figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsSource {
    Computed,
    Override,
    PartialOverride,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedSales {
    #[serde(flatten)]
    pub totals: SalesTotals,
    pub source: TotalsSource,
}

impl ResolvedSales {
    pub fn computed(totals: SalesTotals) -> Self {
        Self {
            totals,
            source: TotalsSource::Computed,
        }
    }
}

/// Month view: each override field that is a number wins, the other falls
/// back to the computed baseline.
pub fn resolve_month(baseline: SalesTotals, stored: Option<&SalesOverride>) -> ResolvedSales {
    let Some(stored) = stored else {
        return ResolvedSales::computed(baseline);
    };

    let source = match (stored.total_sales, stored.total_vat_collected) {
        (Some(_), Some(_)) => TotalsSource::Override,
        (None, None) => TotalsSource::Computed,
        _ => TotalsSource::PartialOverride,
    };

    ResolvedSales {
        totals: SalesTotals {
            total_sales: stored.total_sales.unwrap_or(baseline.total_sales),
            total_vat_collected: stored
                .total_vat_collected
                .unwrap_or(baseline.total_vat_collected),
        },
        source,
    }
}

/// One month's share of a quarter baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthContribution {
    pub month: Month,
    /// Sum of that month's daily entries.
    pub computed: SalesTotals,
    /// What the quarter actually counts for the month.
    pub counted: SalesTotals,
    pub overridden: bool,
}

/// What a month adds to its quarter.
///
/// When a monthly override document exists its values are used as stored,
/// with a non-numeric field counting as zero rather than falling back.
pub fn month_contribution(
    month: Month,
    computed: SalesTotals,
    stored: Option<&SalesOverride>,
) -> MonthContribution {
    match stored {
        Some(stored) => MonthContribution {
            month,
            computed,
            counted: SalesTotals::new(
                stored.total_sales.unwrap_or(0.0),
                stored.total_vat_collected.unwrap_or(0.0),
            ),
            overridden: true,
        },
        None => MonthContribution {
            month,
            computed,
            counted: computed,
            overridden: false,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuarterBaseline {
    pub months: [MonthContribution; 3],
    pub totals: SalesTotals,
}

pub fn quarter_baseline(
    months: &[Month; 3],
    computed: &[SalesTotals; 3],
    monthly_overrides: &HashMap<Month, SalesOverride>,
) -> QuarterBaseline {
    let contributions = [0, 1, 2]
        .map(|i| month_contribution(months[i], computed[i], monthly_overrides.get(&months[i])));
    let totals = contributions.iter().map(|c| c.counted).sum();

    QuarterBaseline {
        months: contributions,
        totals,
    }
}

/// Quarter view: an override only applies when its sales total is a
/// positive number, and then it replaces both figures.
pub fn resolve_quarter(baseline: SalesTotals, stored: Option<&SalesOverride>) -> ResolvedSales {
    match stored {
        Some(stored) if quarter_override_applies(stored) => ResolvedSales {
            totals: SalesTotals {
                total_sales: stored.total_sales.unwrap_or(0.0),
                total_vat_collected: stored.total_vat_collected.unwrap_or(0.0),
            },
            source: TotalsSource::Override,
        },
        _ => ResolvedSales::computed(baseline),
    }
}

pub fn quarter_override_applies(stored: &SalesOverride) -> bool {
    matches!(stored.total_sales, Some(sales) if sales > 0.0)
}
