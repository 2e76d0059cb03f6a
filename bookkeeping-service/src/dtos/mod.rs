pub mod daily_sales;
pub mod invoices;
pub mod summaries;
pub mod suppliers;

pub use daily_sales::{DailySaleListParams, DailySaleRequest, DailySaleResponse};
pub use invoices::{
    CreateInvoiceRequest, DeleteMonthParams, DeleteMonthResponse, InvoiceListParams,
    InvoiceResponse, UpdateInvoiceRequest,
};
pub use summaries::{
    ExportParams, MonthSummaryResponse, OverrideRequest, OverrideResponse, PeriodViewResponse,
    QuarterSummaryResponse,
};
pub use suppliers::{SupplierRequest, SupplierResponse};

use crate::period::{parse_date, Month};
use chrono::NaiveDate;
use service_core::error::AppError;
use validator::ValidationError;

/// Month from an optional query value, defaulting to the current month.
pub fn month_or_current(value: Option<&str>) -> Result<Month, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => Ok(value.parse::<Month>()?),
        None => Ok(Month::current()),
    }
}

pub fn required_date(value: &str) -> Result<NaiveDate, AppError> {
    Ok(parse_date(value)?)
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
