pub mod daily_sales;
pub mod exports;
pub mod health;
pub mod invoices;
pub mod summaries;
pub mod suppliers;
pub mod view;

pub use daily_sales::{create_daily_sale, delete_daily_sale, list_daily_sales, update_daily_sale};
pub use exports::{export_month, export_quarter};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use invoices::{create_invoice, delete_invoice, delete_month, list_invoices, update_invoice};
pub use summaries::{
    clear_month_override, clear_quarter_override, month_summary, quarter_summary,
    save_month_override, save_quarter_override,
};
pub use suppliers::{create_supplier, delete_supplier, list_suppliers, update_supplier};
pub use view::{current_view, select_period};
