//! Manually entered sales totals for a month or a quarter.

use crate::models::{numeric, Collection};
use crate::period::Month;
use serde::{Deserialize, Serialize};

/// Which period an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideScope {
    Monthly,
    Quarterly,
}

impl OverrideScope {
    pub fn collection(&self) -> Collection {
        match self {
            OverrideScope::Monthly => Collection::MonthlySales,
            OverrideScope::Quarterly => Collection::QuarterlySales,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideScope::Monthly => "monthly",
            OverrideScope::Quarterly => "quarterly",
        }
    }
}

/// Override document, keyed by the month (or quarter start month) it covers.
///
/// Either total may be absent or non-numeric in storage; both decode to
/// `None` and the resolver decides what that means for the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOverride {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    #[serde(
        rename = "totalSales",
        default,
        deserialize_with = "numeric::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_sales: Option<f64>,
    #[serde(
        rename = "totalVATCollected",
        default,
        deserialize_with = "numeric::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_vat_collected: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
}

impl SalesOverride {
    pub fn new(month: Month, total_sales: Option<f64>, total_vat_collected: Option<f64>) -> Self {
        Self {
            id: month.to_string(),
            total_sales,
            total_vat_collected,
            month: Some(month),
        }
    }

    /// The period this override is keyed by, taken from the document id.
    pub fn period(&self) -> Option<Month> {
        self.id.parse().ok().or(self.month)
    }
}
