//! Typed record operations over the store adapter.
//!
//! Stored documents are decoded leniently: a document that cannot be read as
//! its model is logged and skipped rather than failing the whole listing.

use crate::aggregation::sort_by_date;
use crate::models::{
    Collection, DailySale, Invoice, OverrideScope, SalesOverride, Supplier, INVOICE_UNIQUE_FIELDS,
};
use crate::period::{format_date, Month};
use crate::services::store::{encode, record_not_found, Condition, Record, RecordStore};
use chrono::NaiveDate;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

pub const DUPLICATE_INVOICE_MESSAGE: &str =
    "Invoice already exists with the same number, amount & VAT";

/// Fields of a new invoice as entered; supplier details are looked up by id.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub date: NaiveDate,
    pub supplier_id: String,
    pub invoice_no: String,
    pub amount_with_vat: f64,
    pub vat_amount: Option<f64>,
}

/// Replacement values for an existing invoice.
///
/// The supplier is named rather than referenced; when `vat_no` is not given
/// it is taken from the supplier with that name, or left empty.
#[derive(Debug, Clone)]
pub struct InvoiceEdit {
    pub date: NaiveDate,
    pub supplier_name: String,
    pub vat_no: Option<String>,
    pub invoice_no: String,
    pub amount_with_vat: f64,
    pub vat_amount: f64,
}

#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn RecordStore>,
}

fn decode_all<T: serde::de::DeserializeOwned>(
    collection: Collection,
    records: Vec<Record>,
) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match record.decode::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    collection = %collection,
                    record_id = %record.id,
                    error = %e,
                    "Skipping unreadable record"
                );
                None
            }
        })
        .collect()
}

fn decode_one<T: serde::de::DeserializeOwned>(
    collection: Collection,
    record: Record,
) -> Result<T, AppError> {
    record.decode().map_err(|e| {
        tracing::error!(collection = %collection, record_id = %record.id, "Failed to decode record: {}", e);
        AppError::DatabaseError(anyhow::anyhow!(
            "Record '{}' in {} is unreadable: {}",
            record.id,
            collection,
            e
        ))
    })
}

fn duplicate_conditions(invoice: &Invoice) -> [Condition; 3] {
    let [number, amount, vat] = INVOICE_UNIQUE_FIELDS;
    [
        Condition::eq(number, invoice.invoice_no.clone()),
        Condition::eq(amount, invoice.amount_with_vat),
        Condition::eq(vat, invoice.vat_amount),
    ]
}

impl Ledger {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    // Suppliers

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let records = self.store.get_all(Collection::Suppliers).await?;
        let mut suppliers: Vec<Supplier> = decode_all(Collection::Suppliers, records);
        suppliers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(suppliers)
    }

    pub async fn get_supplier(&self, id: &str) -> Result<Supplier, AppError> {
        let record = self
            .store
            .get_by_id(Collection::Suppliers, id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Supplier '{}' not found", id)))?;
        decode_one(Collection::Suppliers, record)
    }

    async fn find_supplier_by_name(&self, name: &str) -> Result<Option<Supplier>, AppError> {
        let records = self
            .store
            .get_where(Collection::Suppliers, &[Condition::eq("name", name)])
            .await?;
        Ok(decode_all(Collection::Suppliers, records).into_iter().next())
    }

    #[instrument(skip(self))]
    pub async fn create_supplier(&self, name: &str, vat_no: &str) -> Result<Supplier, AppError> {
        let mut supplier = Supplier::new(name.trim().to_string(), vat_no.trim().to_string());
        supplier.id = self
            .store
            .insert(Collection::Suppliers, encode(&supplier)?)
            .await?;

        tracing::info!(supplier_id = %supplier.id, "Supplier created");
        Ok(supplier)
    }

    /// Past invoices keep the name and VAT number they were written with.
    #[instrument(skip(self))]
    pub async fn update_supplier(
        &self,
        id: &str,
        name: &str,
        vat_no: &str,
    ) -> Result<Supplier, AppError> {
        let mut supplier = Supplier::new(name.trim().to_string(), vat_no.trim().to_string());
        self.store
            .update(Collection::Suppliers, id, encode(&supplier)?)
            .await?;
        supplier.id = id.to_string();
        Ok(supplier)
    }

    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: &str) -> Result<(), AppError> {
        if !self.store.delete(Collection::Suppliers, id).await? {
            return Err(record_not_found(Collection::Suppliers, id));
        }
        Ok(())
    }

    // Invoices

    /// Invoices whose stored month is one of `months`, oldest first.
    pub async fn list_invoices(&self, months: &[Month]) -> Result<Vec<Invoice>, AppError> {
        let condition = match months {
            [month] => Condition::eq("month", month.to_string()),
            _ => Condition::is_in("month", months.iter().map(ToString::to_string)),
        };

        let records = self
            .store
            .get_where(Collection::Invoices, &[condition])
            .await?;
        let mut invoices: Vec<Invoice> = decode_all(Collection::Invoices, records);
        sort_by_date(&mut invoices);
        Ok(invoices)
    }

    pub async fn get_invoice(&self, id: &str) -> Result<Invoice, AppError> {
        let record = self
            .store
            .get_by_id(Collection::Invoices, id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice '{}' not found", id)))?;
        decode_one(Collection::Invoices, record)
    }

    /// Stored invoices sharing number, gross amount and VAT with `invoice`,
    /// other than the one with id `exclude`.
    pub async fn find_duplicates(
        &self,
        invoice: &Invoice,
        exclude: Option<&str>,
    ) -> Result<Vec<Invoice>, AppError> {
        let records = self
            .store
            .get_where(Collection::Invoices, &duplicate_conditions(invoice))
            .await?;

        Ok(records
            .into_iter()
            .filter(|record| Some(record.id.as_str()) != exclude)
            .filter_map(|record| record.decode::<Invoice>().ok())
            .collect())
    }

    async fn ensure_unique(&self, invoice: &Invoice, exclude: Option<&str>) -> Result<(), AppError> {
        let duplicates = self.find_duplicates(invoice, exclude).await?;
        if let Some(existing) = duplicates.first() {
            tracing::warn!(
                invoice_no = %invoice.invoice_no,
                existing_id = %existing.id,
                "Duplicate invoice rejected"
            );
            return Err(AppError::Conflict(anyhow::anyhow!(DUPLICATE_INVOICE_MESSAGE)));
        }
        Ok(())
    }

    #[instrument(skip(self, draft), fields(invoice_no = %draft.invoice_no))]
    pub async fn create_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, AppError> {
        let supplier = self.get_supplier(&draft.supplier_id).await?;

        let mut invoice = Invoice::new(
            draft.date,
            supplier.id,
            supplier.name,
            supplier.vat_no,
            draft.invoice_no.trim().to_string(),
            draft.amount_with_vat,
            draft.vat_amount.unwrap_or(0.0),
        );

        self.ensure_unique(&invoice, None).await?;
        invoice.id = self
            .store
            .insert(Collection::Invoices, encode(&invoice)?)
            .await?;

        tracing::info!(invoice_id = %invoice.id, month = %invoice.month, "Invoice created");
        Ok(invoice)
    }

    #[instrument(skip(self, edit), fields(invoice_no = %edit.invoice_no))]
    pub async fn update_invoice(&self, id: &str, edit: InvoiceEdit) -> Result<Invoice, AppError> {
        let existing = self.get_invoice(id).await?;
        let supplier = self.find_supplier_by_name(&edit.supplier_name).await?;

        let vat_no = match (edit.vat_no, &supplier) {
            (Some(vat_no), _) => vat_no,
            (None, Some(supplier)) => supplier.vat_no.clone(),
            (None, None) => String::new(),
        };
        let supplier_id = supplier.map(|s| s.id).unwrap_or(existing.supplier_id);

        let mut invoice = Invoice::new(
            edit.date,
            supplier_id,
            edit.supplier_name,
            vat_no,
            edit.invoice_no.trim().to_string(),
            edit.amount_with_vat,
            edit.vat_amount,
        );

        self.ensure_unique(&invoice, Some(id)).await?;
        self.store
            .update(Collection::Invoices, id, encode(&invoice)?)
            .await?;

        invoice.id = id.to_string();
        tracing::info!(invoice_id = %id, month = %invoice.month, "Invoice updated");
        Ok(invoice)
    }

    #[instrument(skip(self))]
    pub async fn delete_invoice(&self, id: &str) -> Result<(), AppError> {
        if !self.store.delete(Collection::Invoices, id).await? {
            return Err(record_not_found(Collection::Invoices, id));
        }
        Ok(())
    }

    /// Removes every invoice of `month` in one batch request.
    #[instrument(skip(self), fields(month = %month))]
    pub async fn delete_month(&self, month: Month) -> Result<u64, AppError> {
        let ids: Vec<String> = self
            .store
            .get_where(
                Collection::Invoices,
                &[Condition::eq("month", month.to_string())],
            )
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect();

        let deleted = self.store.batch_delete(Collection::Invoices, &ids).await?;
        tracing::info!(deleted, "Deleted invoices for month");
        Ok(deleted)
    }

    // Daily sales

    pub async fn list_daily_sales_on(&self, date: NaiveDate) -> Result<Vec<DailySale>, AppError> {
        let records = self
            .store
            .get_where(
                Collection::DailySales,
                &[Condition::eq("date", format_date(date))],
            )
            .await?;
        Ok(decode_all(Collection::DailySales, records))
    }

    /// Entries dated in `[start, end)`, oldest first.
    pub async fn list_daily_sales_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySale>, AppError> {
        let records = self
            .store
            .get_where(
                Collection::DailySales,
                &[
                    Condition::gte("date", format_date(start)),
                    Condition::lt("date", format_date(end)),
                ],
            )
            .await?;
        let mut entries: Vec<DailySale> = decode_all(Collection::DailySales, records);
        entries.sort_by_key(|entry| entry.date);
        Ok(entries)
    }

    #[instrument(skip(self))]
    pub async fn create_daily_sale(
        &self,
        date: NaiveDate,
        amount: f64,
        vat_amount: f64,
    ) -> Result<DailySale, AppError> {
        let mut entry = DailySale::new(date, amount, vat_amount);
        entry.id = self
            .store
            .insert(Collection::DailySales, encode(&entry)?)
            .await?;
        Ok(entry)
    }

    #[instrument(skip(self))]
    pub async fn update_daily_sale(
        &self,
        id: &str,
        date: NaiveDate,
        amount: f64,
        vat_amount: f64,
    ) -> Result<DailySale, AppError> {
        let mut entry = DailySale::new(date, amount, vat_amount);
        self.store
            .update(Collection::DailySales, id, encode(&entry)?)
            .await?;
        entry.id = id.to_string();
        Ok(entry)
    }

    #[instrument(skip(self))]
    pub async fn delete_daily_sale(&self, id: &str) -> Result<(), AppError> {
        if !self.store.delete(Collection::DailySales, id).await? {
            return Err(record_not_found(Collection::DailySales, id));
        }
        Ok(())
    }

    // Overrides

    pub async fn get_override(
        &self,
        scope: OverrideScope,
        month: Month,
    ) -> Result<Option<SalesOverride>, AppError> {
        let collection = scope.collection();
        let Some(record) = self
            .store
            .get_by_id(collection, &month.to_string())
            .await?
        else {
            return Ok(None);
        };

        match record.decode() {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                tracing::warn!(
                    collection = %collection,
                    month = %month,
                    error = %e,
                    "Ignoring unreadable override"
                );
                Ok(None)
            }
        }
    }

    /// Monthly overrides for any of `months`, fetched in one query.
    pub async fn monthly_overrides(
        &self,
        months: &[Month],
    ) -> Result<HashMap<Month, SalesOverride>, AppError> {
        let records = self
            .store
            .get_where(
                Collection::MonthlySales,
                &[Condition::is_in(
                    "month",
                    months.iter().map(ToString::to_string),
                )],
            )
            .await?;

        Ok(
            decode_all::<SalesOverride>(Collection::MonthlySales, records)
                .into_iter()
                .filter_map(|stored| stored.period().map(|month| (month, stored)))
                .filter(|(month, _)| months.contains(month))
                .collect(),
        )
    }

    #[instrument(skip(self), fields(scope = scope.as_str(), month = %month))]
    pub async fn save_override(
        &self,
        scope: OverrideScope,
        month: Month,
        total_sales: Option<f64>,
        total_vat_collected: Option<f64>,
    ) -> Result<SalesOverride, AppError> {
        let stored = SalesOverride::new(month, total_sales, total_vat_collected);
        self.store
            .upsert(scope.collection(), &stored.id, encode(&stored)?)
            .await?;

        tracing::info!("Override saved");
        Ok(stored)
    }

    /// Returns whether an override was present.
    #[instrument(skip(self), fields(scope = scope.as_str(), month = %month))]
    pub async fn clear_override(&self, scope: OverrideScope, month: Month) -> Result<bool, AppError> {
        let removed = self
            .store
            .delete(scope.collection(), &month.to_string())
            .await?;
        tracing::info!(removed, "Override cleared");
        Ok(removed)
    }
}
