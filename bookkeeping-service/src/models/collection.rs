use serde::{Deserialize, Serialize};
use std::fmt;

/// Named collections held by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Invoices,
    Suppliers,
    DailySales,
    MonthlySales,
    QuarterlySales,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Invoices => "invoices",
            Collection::Suppliers => "suppliers",
            Collection::DailySales => "dailySales",
            Collection::MonthlySales => "monthlySales",
            Collection::QuarterlySales => "quarterlySales",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
