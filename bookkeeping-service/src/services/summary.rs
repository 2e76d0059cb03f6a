//! Period summaries: fetch, aggregate, resolve overrides, export.
//!
//! Every call re-fetches its records, so a summary is always computed from
//! the store's current state and never from a previous result.

use crate::aggregation::{
    partition_by_month, purchase_totals, sales_baseline, PurchaseTotals, SalesTotals,
};
use crate::export::{month_sheet, quarter_sheet, ExportSummary, Sheet};
use crate::models::{Invoice, OverrideScope, SalesOverride};
use crate::overrides::{quarter_baseline, resolve_month, resolve_quarter, QuarterBaseline, ResolvedSales};
use crate::period::{month_date_range, quarter_date_range, quarter_months, Month};
use crate::services::ledger::Ledger;
use crate::services::metrics::record_export;
use service_core::error::AppError;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: Month,
    pub invoices: Vec<Invoice>,
    pub purchases: PurchaseTotals,
    /// Sum of the month's daily entries, before any override.
    pub computed_sales: SalesTotals,
    pub sales: ResolvedSales,
    pub sales_override: Option<SalesOverride>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuarterSummary {
    pub start: Month,
    pub months: [Month; 3],
    pub invoices: Vec<Invoice>,
    pub purchases: PurchaseTotals,
    pub baseline: QuarterBaseline,
    pub sales: ResolvedSales,
    pub sales_override: Option<SalesOverride>,
}

#[derive(Clone)]
pub struct SummaryService {
    ledger: Ledger,
}

impl SummaryService {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    #[instrument(skip(self), fields(month = %month))]
    pub async fn month_summary(&self, month: Month) -> Result<MonthSummary, AppError> {
        let (start, end) = month_date_range(month);
        let months = [month];

        let (invoices, entries, sales_override) = tokio::try_join!(
            self.ledger.list_invoices(&months),
            self.ledger.list_daily_sales_between(start, end),
            self.ledger.get_override(OverrideScope::Monthly, month),
        )?;

        let computed_sales = sales_baseline(&entries, month);
        let sales = resolve_month(computed_sales, sales_override.as_ref());

        tracing::debug!(
            invoices = invoices.len(),
            entries = entries.len(),
            source = ?sales.source,
            "Month summary computed"
        );

        Ok(MonthSummary {
            month,
            purchases: purchase_totals(&invoices),
            invoices,
            computed_sales,
            sales,
            sales_override,
        })
    }

    /// Quarter sales before any quarterly override: daily entries are fetched
    /// once for the whole window and split by month.
    pub async fn quarter_sales_baseline(&self, start: Month) -> Result<QuarterBaseline, AppError> {
        let months = quarter_months(start);
        let (from, until) = quarter_date_range(start);

        let (entries, monthly_overrides) = tokio::try_join!(
            self.ledger.list_daily_sales_between(from, until),
            self.ledger.monthly_overrides(&months),
        )?;

        let computed = partition_by_month(&entries, &months);
        Ok(quarter_baseline(&months, &computed, &monthly_overrides))
    }

    #[instrument(skip(self), fields(start = %start))]
    pub async fn quarter_summary(&self, start: Month) -> Result<QuarterSummary, AppError> {
        let months = quarter_months(start);

        let (invoices, baseline, sales_override) = tokio::try_join!(
            self.ledger.list_invoices(&months),
            self.quarter_sales_baseline(start),
            self.ledger.get_override(OverrideScope::Quarterly, start),
        )?;

        let sales = resolve_quarter(baseline.totals, sales_override.as_ref());

        tracing::debug!(
            invoices = invoices.len(),
            source = ?sales.source,
            "Quarter summary computed"
        );

        Ok(QuarterSummary {
            start,
            months,
            purchases: purchase_totals(&invoices),
            invoices,
            baseline,
            sales,
            sales_override,
        })
    }

    pub async fn save_month_override(
        &self,
        month: Month,
        total_sales: Option<f64>,
        total_vat_collected: Option<f64>,
    ) -> Result<MonthSummary, AppError> {
        self.ledger
            .save_override(OverrideScope::Monthly, month, total_sales, total_vat_collected)
            .await?;
        self.month_summary(month).await
    }

    pub async fn clear_month_override(&self, month: Month) -> Result<MonthSummary, AppError> {
        self.ledger
            .clear_override(OverrideScope::Monthly, month)
            .await?;
        self.month_summary(month).await
    }

    pub async fn save_quarter_override(
        &self,
        start: Month,
        total_sales: Option<f64>,
        total_vat_collected: Option<f64>,
    ) -> Result<QuarterSummary, AppError> {
        self.ledger
            .save_override(OverrideScope::Quarterly, start, total_sales, total_vat_collected)
            .await?;
        self.quarter_summary(start).await
    }

    /// Deletes the quarterly override and returns the summary recomputed from
    /// freshly fetched daily entries and monthly overrides.
    pub async fn clear_quarter_override(&self, start: Month) -> Result<QuarterSummary, AppError> {
        self.ledger
            .clear_override(OverrideScope::Quarterly, start)
            .await?;
        self.quarter_summary(start).await
    }

    #[instrument(skip(self), fields(month = %month))]
    pub async fn export_month(&self, month: Month) -> Result<Sheet, AppError> {
        let summary = self.month_summary(month).await?;
        let totals = ExportSummary::new(summary.purchases, summary.sales);

        let sheet = month_sheet(&summary.invoices, Some(&totals));
        record_export("monthly", sheet.is_ok());
        Ok(sheet?)
    }

    #[instrument(skip(self), fields(start = %start))]
    pub async fn export_quarter(&self, start: Month) -> Result<Sheet, AppError> {
        let summary = self.quarter_summary(start).await?;
        let totals = ExportSummary::new(summary.purchases, summary.sales);

        let sheet = quarter_sheet(&summary.months, &summary.invoices, &totals);
        record_export("quarterly", sheet.is_ok());
        Ok(sheet?)
    }
}
