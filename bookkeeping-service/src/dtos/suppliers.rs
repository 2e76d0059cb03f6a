use crate::dtos::not_blank;
use crate::models::Supplier;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SupplierRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub vat_no: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupplierResponse {
    pub id: String,
    pub name: String,
    pub vat_no: String,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        Self {
            id: supplier.id,
            name: supplier.name,
            vat_no: supplier.vat_no,
        }
    }
}
