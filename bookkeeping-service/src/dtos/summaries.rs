use crate::aggregation::{PurchaseTotals, SalesTotals};
use crate::dtos::InvoiceResponse;
use crate::models::SalesOverride;
use crate::overrides::{MonthContribution, ResolvedSales};
use crate::services::{MonthSummary, PeriodSnapshot, QuarterSummary};
use serde::{Deserialize, Serialize};

/// Manual sales figures. An omitted field is stored as absent and the
/// resolver decides how the period treats it.
#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    pub total_sales: Option<f64>,
    pub total_vat_collected: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct OverrideResponse {
    pub total_sales: Option<f64>,
    pub total_vat_collected: Option<f64>,
}

impl From<SalesOverride> for OverrideResponse {
    fn from(stored: SalesOverride) -> Self {
        Self {
            total_sales: stored.total_sales,
            total_vat_collected: stored.total_vat_collected,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MonthSummaryResponse {
    pub month: String,
    pub invoices: Vec<InvoiceResponse>,
    pub purchases: PurchaseTotals,
    pub computed_sales: SalesTotals,
    pub sales: ResolvedSales,
    pub sales_override: Option<OverrideResponse>,
}

impl From<MonthSummary> for MonthSummaryResponse {
    fn from(summary: MonthSummary) -> Self {
        Self {
            month: summary.month.to_string(),
            invoices: summary.invoices.into_iter().map(Into::into).collect(),
            purchases: summary.purchases,
            computed_sales: summary.computed_sales,
            sales: summary.sales,
            sales_override: summary.sales_override.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuarterSummaryResponse {
    pub start: String,
    pub months: Vec<MonthContribution>,
    pub invoices: Vec<InvoiceResponse>,
    pub purchases: PurchaseTotals,
    /// Quarter sales before any quarterly override.
    pub baseline_sales: SalesTotals,
    pub sales: ResolvedSales,
    pub sales_override: Option<OverrideResponse>,
}

impl From<QuarterSummary> for QuarterSummaryResponse {
    fn from(summary: QuarterSummary) -> Self {
        Self {
            start: summary.start.to_string(),
            months: summary.baseline.months.to_vec(),
            invoices: summary.invoices.into_iter().map(Into::into).collect(),
            purchases: summary.purchases,
            baseline_sales: summary.baseline.totals,
            sales: summary.sales,
            sales_override: summary.sales_override.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "summary", rename_all = "snake_case")]
pub enum PeriodViewResponse {
    Month(MonthSummaryResponse),
    Quarter(QuarterSummaryResponse),
}

impl From<PeriodSnapshot> for PeriodViewResponse {
    fn from(snapshot: PeriodSnapshot) -> Self {
        match snapshot {
            PeriodSnapshot::Month(summary) => PeriodViewResponse::Month(summary.into()),
            PeriodSnapshot::Quarter(summary) => PeriodViewResponse::Quarter(summary.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub filename: Option<String>,
}
