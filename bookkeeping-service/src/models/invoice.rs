//! Purchase invoice model.

use crate::models::numeric;
use crate::period::Month;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fields that together identify a duplicate invoice.
pub const INVOICE_UNIQUE_FIELDS: [&str; 3] = ["invoiceNo", "amountWithVAT", "vatAmount"];

/// Purchase invoice document.
///
/// Supplier name and VAT number are denormalised copies taken when the
/// invoice is written. `month` is always derived from `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    pub date: NaiveDate,
    pub month: Month,
    #[serde(default)]
    pub supplier_id: String,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub vat_no: String,
    #[serde(default)]
    pub invoice_no: String,
    #[serde(
        rename = "amountWithVAT",
        default,
        deserialize_with = "numeric::amount"
    )]
    pub amount_with_vat: f64,
    #[serde(default, deserialize_with = "numeric::amount")]
    pub vat_amount: f64,
}

impl Invoice {
    pub fn new(
        date: NaiveDate,
        supplier_id: String,
        supplier_name: String,
        vat_no: String,
        invoice_no: String,
        amount_with_vat: f64,
        vat_amount: f64,
    ) -> Self {
        Self {
            id: String::new(),
            date,
            month: Month::of(date),
            supplier_id,
            supplier_name,
            vat_no,
            invoice_no,
            amount_with_vat,
            vat_amount,
        }
    }

    /// True when both invoices carry the same number, gross amount and VAT.
    pub fn collides_with(&self, other: &Invoice) -> bool {
        self.invoice_no == other.invoice_no
            && self.amount_with_vat == other.amount_with_vat
            && self.vat_amount == other.vat_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn serializes_with_stored_field_names() {
        let invoice = Invoice::new(
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            "sup-1".into(),
            "Acme".into(),
            "GB123".into(),
            "INV-7".into(),
            120.0,
            20.0,
        );

        let document = bson::to_document(&invoice).unwrap();
        assert!(document.get("_id").is_none());
        assert_eq!(document.get_str("date").unwrap(), "2024-03-09");
        assert_eq!(document.get_str("month").unwrap(), "2024-03");
        assert_eq!(document.get_str("supplierName").unwrap(), "Acme");
        assert_eq!(document.get_str("invoiceNo").unwrap(), "INV-7");
        assert_eq!(document.get_f64("amountWithVAT").unwrap(), 120.0);
        assert_eq!(document.get_f64("vatAmount").unwrap(), 20.0);
    }

    #[test]
    fn decodes_legacy_documents_with_missing_amounts() {
        let invoice: Invoice = bson::from_document(doc! {
            "_id": "abc",
            "date": "2024-03-09",
            "month": "2024-03",
            "supplierName": "Acme",
            "invoiceNo": "INV-7",
            "amountWithVAT": "oops",
        })
        .unwrap();

        assert_eq!(invoice.id, "abc");
        assert_eq!(invoice.amount_with_vat, 0.0);
        assert_eq!(invoice.vat_amount, 0.0);
        assert_eq!(invoice.supplier_id, "");
    }
}
