pub mod database;
pub mod ledger;
pub mod memory;
pub mod metrics;
pub mod period_view;
pub mod store;
pub mod summary;

pub use database::MongoDb;
pub use ledger::{InvoiceDraft, InvoiceEdit, Ledger};
pub use memory::InMemoryStore;
pub use metrics::{get_metrics, init_metrics};
pub use period_view::{Period, PeriodSnapshot, PeriodView};
pub use store::{Condition, Operator, Record, RecordStore};
pub use summary::{MonthSummary, QuarterSummary, SummaryService};
