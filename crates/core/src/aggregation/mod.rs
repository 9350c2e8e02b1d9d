//! Financial aggregation.
//!
//! Pure functions over already-fetched invoice/expense rows. Callers fetch
//! scoped rows from the repositories and pass `today` explicitly so results
//! are deterministic and independently testable. All arithmetic is
//! `Decimal`; the figures never touch floating point.

pub mod aging;
pub mod balances;
pub mod profit;
pub mod summary;
pub mod types;

#[cfg(test)]
mod tests;

pub use aging::{aging_buckets, outstanding_revenue};
pub use balances::client_balances;
pub use profit::profit_and_loss;
pub use summary::{SummaryCounts, summary_counts};
pub use types::{
    AgingBuckets, ClientBalances, ExpenseFigures, InvoiceFigures, OutstandingRevenue,
    ProfitAndLoss,
};
