pub mod collection;
pub mod daily_sale;
pub mod invoice;
pub mod numeric;
pub mod sales_override;
pub mod supplier;

pub use collection::Collection;
pub use daily_sale::DailySale;
pub use invoice::{Invoice, INVOICE_UNIQUE_FIELDS};
pub use sales_override::{OverrideScope, SalesOverride};
pub use supplier::Supplier;
