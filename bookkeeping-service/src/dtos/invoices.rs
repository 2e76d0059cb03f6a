use crate::dtos::{not_blank, required_date};
use crate::models::Invoice;
use crate::services::{InvoiceDraft, InvoiceEdit};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    #[validate(custom(function = "not_blank"))]
    pub supplier_id: String,
    #[validate(custom(function = "not_blank"))]
    pub invoice_no: String,
    #[validate(required(message = "Amount with VAT is required"))]
    pub amount_with_vat: Option<f64>,
    /// Blank means no VAT.
    pub vat_amount: Option<f64>,
}

impl CreateInvoiceRequest {
    pub fn into_draft(self) -> Result<InvoiceDraft, AppError> {
        Ok(InvoiceDraft {
            date: required_date(&self.date)?,
            supplier_id: self.supplier_id,
            invoice_no: self.invoice_no,
            amount_with_vat: self.amount_with_vat.unwrap_or_default(),
            vat_amount: self.vat_amount,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    #[validate(custom(function = "not_blank"))]
    pub supplier_name: String,
    pub vat_no: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub invoice_no: String,
    #[validate(required(message = "Amount with VAT is required"))]
    pub amount_with_vat: Option<f64>,
    #[validate(required(message = "VAT amount is required"))]
    pub vat_amount: Option<f64>,
}

impl UpdateInvoiceRequest {
    pub fn into_edit(self) -> Result<InvoiceEdit, AppError> {
        Ok(InvoiceEdit {
            date: required_date(&self.date)?,
            supplier_name: self.supplier_name,
            vat_no: self.vat_no,
            invoice_no: self.invoice_no,
            amount_with_vat: self.amount_with_vat.unwrap_or_default(),
            vat_amount: self.vat_amount.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub date: String,
    pub month: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub vat_no: String,
    pub invoice_no: String,
    pub amount_with_vat: f64,
    pub vat_amount: f64,
}

impl From<Invoice> for InvoiceResponse {
    fn from(inv: Invoice) -> Self {
        Self {
            id: inv.id,
            date: crate::period::format_date(inv.date),
            month: inv.month.to_string(),
            supplier_id: inv.supplier_id,
            supplier_name: inv.supplier_name,
            vat_no: inv.vat_no,
            invoice_no: inv.invoice_no,
            amount_with_vat: inv.amount_with_vat,
            vat_amount: inv.vat_amount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InvoiceListParams {
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMonthParams {
    pub month: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteMonthResponse {
    pub month: String,
    pub deleted: u64,
}
