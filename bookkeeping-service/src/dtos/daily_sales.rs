use crate::models::DailySale;
use crate::period::format_date;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct DailySaleRequest {
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    #[validate(required(message = "Amount is required"))]
    pub amount: Option<f64>,
    #[validate(required(message = "VAT amount is required"))]
    pub vat_amount: Option<f64>,
}

/// Either a single day or a whole month; a day wins when both are given.
#[derive(Debug, Deserialize)]
pub struct DailySaleListParams {
    pub date: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailySaleResponse {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub vat_amount: f64,
}

impl From<DailySale> for DailySaleResponse {
    fn from(entry: DailySale) -> Self {
        Self {
            id: entry.id,
            date: format_date(entry.date),
            amount: entry.amount,
            vat_amount: entry.vat_amount,
        }
    }
}
