use serde::{Deserialize, Serialize};

/// A supplier whose name and VAT number are copied onto invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vat_no: String,
}

impl Supplier {
    pub fn new(name: String, vat_no: String) -> Self {
        Self {
            id: String::new(),
            name,
            vat_no,
        }
    }
}
