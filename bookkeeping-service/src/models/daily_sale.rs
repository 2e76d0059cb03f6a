use crate::models::numeric;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Takings recorded for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySale {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "numeric::amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "numeric::amount")]
    pub vat_amount: f64,
}

impl DailySale {
    pub fn new(date: NaiveDate, amount: f64, vat_amount: f64) -> Self {
        Self {
            id: String::new(),
            date,
            amount,
            vat_amount,
        }
    }
}
