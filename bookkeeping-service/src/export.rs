//! Tabular export of a period's invoices and totals.
//!
//! A sheet is a plain list of rows; blank rows separate sections. Sheets are
//! written out as CSV.

use crate::aggregation::{format_amount, invoices_in_month, PurchaseTotals};
use crate::models::Invoice;
use crate::overrides::ResolvedSales;
use crate::period::{format_date, Month};
use service_core::error::AppError;
use std::io::Write;
use thiserror::Error;

pub const MONTH_HEADER: [&str; 6] = [
    "Date",
    "Supplier",
    "Invoice No",
    "VAT No",
    "Amount (with VAT)",
    "VAT Amount",
];

pub const QUARTER_HEADER: [&str; 7] = [
    "Month",
    "Date",
    "Supplier",
    "Invoice No",
    "VAT No",
    "Amount (with VAT)",
    "VAT Amount",
];

/// Blank rows after each month block of a quarter sheet.
const MONTH_GAP_ROWS: usize = 6;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    NoData,

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NoData => AppError::NotFound(anyhow::Error::new(err)),
            other => AppError::InternalError(anyhow::Error::new(other)),
        }
    }
}

/// The four labelled totals closing every export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSummary {
    pub total_amount: f64,
    pub total_sales: f64,
    pub total_vat: f64,
    pub total_vat_collected: f64,
}

impl ExportSummary {
    pub fn new(purchases: PurchaseTotals, sales: ResolvedSales) -> Self {
        Self {
            total_amount: purchases.total_with_vat,
            total_sales: sales.totals.total_sales,
            total_vat: purchases.total_vat,
            total_vat_collected: sales.totals.total_vat_collected,
        }
    }

    fn rows(&self) -> [Vec<String>; 4] {
        [
            labelled("Total Purchase", self.total_amount),
            labelled("Total Sales", self.total_sales),
            labelled("Total VAT Given", self.total_vat),
            labelled("Total VAT Collected", self.total_vat_collected),
        ]
    }
}

fn labelled(label: &str, value: f64) -> Vec<String> {
    vec![label.to_string(), format_amount(value)]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    fn blank(&mut self) {
        self.rows.push(Vec::new());
    }

    /// Blank rows become empty lines; csv itself would write `""` for them.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        for (i, section) in self.rows.split(|row| row.is_empty()).enumerate() {
            if i > 0 {
                writer.write_all(b"\n")?;
            }

            let mut csv = csv::WriterBuilder::new()
                .flexible(true)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut writer);
            for row in section {
                csv.write_record(row)?;
            }
            csv.flush()?;
        }

        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(buffer)
    }
}

fn invoice_cells(inv: &Invoice) -> [String; 6] {
    [
        format_date(inv.date),
        inv.supplier_name.clone(),
        inv.invoice_no.clone(),
        inv.vat_no.clone(),
        format_amount(inv.amount_with_vat),
        format_amount(inv.vat_amount),
    ]
}

/// Flat month sheet: header, invoice rows, then the summary block if given.
pub fn month_sheet(
    invoices: &[Invoice],
    summary: Option<&ExportSummary>,
) -> Result<Sheet, ExportError> {
    if invoices.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut sheet = Sheet::default();
    sheet.push(MONTH_HEADER);
    for inv in invoices {
        sheet.push(invoice_cells(inv));
    }

    if let Some(summary) = summary {
        sheet.blank();
        for row in summary.rows() {
            sheet.push(row);
        }
    }

    Ok(sheet)
}

/// Quarter sheet: one labelled block per month, then the summary block.
pub fn quarter_sheet(
    months: &[Month; 3],
    invoices: &[Invoice],
    summary: &ExportSummary,
) -> Result<Sheet, ExportError> {
    if invoices.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut sheet = Sheet::default();
    sheet.push(QUARTER_HEADER);

    for month in months {
        let mut label = vec![month.to_string()];
        label.resize(QUARTER_HEADER.len(), String::new());
        sheet.push(label);

        for inv in invoices_in_month(invoices, *month) {
            sheet.push(std::iter::once(String::new()).chain(invoice_cells(inv)));
        }
        for _ in 0..MONTH_GAP_ROWS {
            sheet.blank();
        }
    }

    sheet.blank();
    for row in summary.rows() {
        sheet.push(row);
    }

    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::SalesTotals;
    use crate::period::quarter_months;
    use chrono::NaiveDate;

    fn invoice(no: &str, y: i32, m: u32, d: u32, amount: f64, vat: f64) -> Invoice {
        Invoice::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            "sup".into(),
            "Acme Ltd".into(),
            "GB999".into(),
            no.into(),
            amount,
            vat,
        )
    }

    fn summary() -> ExportSummary {
        ExportSummary::new(
            PurchaseTotals {
                total_with_vat: 180.0,
                total_vat: 30.0,
            },
            ResolvedSales::computed(SalesTotals::new(500.0, 50.0)),
        )
    }

    #[test]
    fn empty_month_signals_no_data() {
        assert!(matches!(month_sheet(&[], None), Err(ExportError::NoData)));
        assert!(matches!(
            month_sheet(&[], Some(&summary())),
            Err(ExportError::NoData)
        ));
    }

    #[test]
    fn empty_quarter_signals_no_data() {
        let months = quarter_months("2024-01".parse().unwrap());
        assert!(matches!(
            quarter_sheet(&months, &[], &summary()),
            Err(ExportError::NoData)
        ));
    }

    #[test]
    fn month_sheet_has_header_rows_and_summary() {
        let invoices = vec![
            invoice("A1", 2024, 5, 1, 120.0, 20.0),
            invoice("A2", 2024, 5, 9, 60.0, 10.0),
        ];
        let sheet = month_sheet(&invoices, Some(&summary())).unwrap();
        let rows = sheet.rows();

        assert_eq!(rows[0], MONTH_HEADER);
        assert_eq!(
            rows[1],
            ["2024-05-01", "Acme Ltd", "A1", "GB999", "120.00", "20.00"]
        );
        assert!(rows[3].is_empty());
        assert_eq!(rows[4], ["Total Purchase", "180.00"]);
        assert_eq!(rows[5], ["Total Sales", "500.00"]);
        assert_eq!(rows[6], ["Total VAT Given", "30.00"]);
        assert_eq!(rows[7], ["Total VAT Collected", "50.00"]);
        assert_eq!(rows.len(), 8);
    }

    #[test]
    fn month_sheet_without_summary_is_flat() {
        let invoices = vec![invoice("A1", 2024, 5, 1, 1.0, 0.0)];
        let sheet = month_sheet(&invoices, None).unwrap();
        assert_eq!(sheet.rows().len(), 2);
    }

    #[test]
    fn quarter_sheet_groups_invoices_by_month() {
        let months = quarter_months("2024-11".parse().unwrap());
        let invoices = vec![
            invoice("N1", 2024, 11, 2, 10.0, 1.0),
            invoice("J1", 2025, 1, 5, 30.0, 3.0),
        ];
        let sheet = quarter_sheet(&months, &invoices, &summary()).unwrap();
        let rows = sheet.rows();

        assert_eq!(rows[0], QUARTER_HEADER);
        assert_eq!(rows[1], ["2024-11", "", "", "", "", "", ""]);
        assert_eq!(
            rows[2],
            ["", "2024-11-02", "Acme Ltd", "N1", "GB999", "10.00", "1.00"]
        );
        assert!(rows[3..9].iter().all(|row| row.is_empty()));
        assert_eq!(rows[9][0], "2024-12");
        assert!(rows[10..16].iter().all(|row| row.is_empty()));
        assert_eq!(rows[16][0], "2025-01");
        assert_eq!(rows[17][3], "J1");
        assert!(rows[18..25].iter().all(|row| row.is_empty()));
        assert_eq!(rows[25][0], "Total Purchase");

        let tail: Vec<&str> = rows[rows.len() - 4..]
            .iter()
            .map(|row| row[0].as_str())
            .collect();
        assert_eq!(
            tail,
            ["Total Purchase", "Total Sales", "Total VAT Given", "Total VAT Collected"]
        );
    }

    #[test]
    fn writes_csv_text() {
        let invoices = vec![invoice("A,1", 2024, 5, 1, 120.0, 20.0)];
        let sheet = month_sheet(&invoices, Some(&summary())).unwrap();
        let text = String::from_utf8(sheet.to_csv_bytes().unwrap()).unwrap();

        assert!(text.starts_with("Date,Supplier,Invoice No,VAT No,Amount (with VAT),VAT Amount\n"));
        assert!(text.contains("2024-05-01,Acme Ltd,\"A,1\",GB999,120.00,20.00\n"));
        assert!(text.contains("20.00\n\nTotal Purchase,180.00\n"));
        assert!(text.ends_with("Total VAT Collected,50.00\n"));
    }
}
