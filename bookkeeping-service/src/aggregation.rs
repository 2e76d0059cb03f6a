//! Purchase and sales totals computed from raw records.
//!
//! Everything here is pure: callers fetch the records for a period and pass
//! them in. Sums are accumulated as `f64` and only rounded for display.

use crate::models::{DailySale, Invoice};
use crate::period::Month;
use serde::Serialize;
use std::iter::Sum;
use std::ops::Add;

/// Purchase totals over a set of invoices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PurchaseTotals {
    pub total_with_vat: f64,
    pub total_vat: f64,
}

/// Sales figures for a period, computed or overridden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SalesTotals {
    pub total_sales: f64,
    pub total_vat_collected: f64,
}

impl SalesTotals {
    pub fn new(total_sales: f64, total_vat_collected: f64) -> Self {
        Self {
            total_sales,
            total_vat_collected,
        }
    }
}

impl Add for SalesTotals {
    type Output = SalesTotals;

    fn add(self, rhs: SalesTotals) -> SalesTotals {
        SalesTotals {
            total_sales: self.total_sales + rhs.total_sales,
            total_vat_collected: self.total_vat_collected + rhs.total_vat_collected,
        }
    }
}

impl Sum for SalesTotals {
    fn sum<I: Iterator<Item = SalesTotals>>(iter: I) -> Self {
        iter.fold(SalesTotals::default(), Add::add)
    }
}

impl Add for PurchaseTotals {
    type Output = PurchaseTotals;

    fn add(self, rhs: PurchaseTotals) -> PurchaseTotals {
        PurchaseTotals {
            total_with_vat: self.total_with_vat + rhs.total_with_vat,
            total_vat: self.total_vat + rhs.total_vat,
        }
    }
}

pub fn purchase_totals<'a, I>(invoices: I) -> PurchaseTotals
where
    I: IntoIterator<Item = &'a Invoice>,
{
    invoices
        .into_iter()
        .fold(PurchaseTotals::default(), |acc, inv| PurchaseTotals {
            total_with_vat: acc.total_with_vat + inv.amount_with_vat,
            total_vat: acc.total_vat + inv.vat_amount,
        })
}

/// Sum of daily entries dated inside `month`; entries outside it are ignored.
pub fn sales_baseline(entries: &[DailySale], month: Month) -> SalesTotals {
    entries
        .iter()
        .filter(|entry| month.contains(entry.date))
        .map(|entry| SalesTotals::new(entry.amount, entry.vat_amount))
        .sum()
}

/// Splits one quarter-wide fetch of daily entries into per-month baselines.
pub fn partition_by_month(entries: &[DailySale], months: &[Month; 3]) -> [SalesTotals; 3] {
    months.map(|month| sales_baseline(entries, month))
}

/// Invoices whose stored month matches, in the order given.
pub fn invoices_in_month(invoices: &[Invoice], month: Month) -> impl Iterator<Item = &Invoice> {
    invoices.iter().filter(move |inv| inv.month == month)
}

/// Sorts invoices by date ascending for display; sums do not depend on it.
pub fn sort_by_date(invoices: &mut [Invoice]) {
    invoices.sort_by(|a, b| a.date.cmp(&b.date));
}

/// Two-decimal rendering used by summaries and exports.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}
