//! Input and output shapes for the aggregation functions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::invoice::InvoiceStatus;

/// The slice of an invoice row the aggregation functions need.
#[derive(Debug, Clone)]
pub struct InvoiceFigures {
    /// Owning client.
    pub client_id: Uuid,
    /// Stored status.
    pub status: InvoiceStatus,
    /// Invoice total as submitted.
    pub total: Decimal,
    /// Amount paid so far.
    pub amount_paid: Decimal,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Date the invoice was fully paid, if any.
    pub paid_at: Option<NaiveDate>,
}

/// The slice of an expense row the profit calculation needs.
#[derive(Debug, Clone)]
pub struct ExpenseFigures {
    /// Expense amount.
    pub amount: Decimal,
    /// Date the expense was incurred.
    pub expense_date: NaiveDate,
}

/// Per-client rollup of invoice balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBalances {
    /// Sum of DRAFT invoice totals.
    pub draft: Decimal,
    /// Sum of remaining balances on open invoices.
    pub outstanding: Decimal,
    /// Portion of `outstanding` that is past due.
    pub overdue: Decimal,
}

/// Open-invoice totals bucketed by days overdue. Bucket order is part of
/// the contract: current through 90+.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgingBuckets {
    /// Not yet due (due today or later).
    pub current: Decimal,
    /// 1 to 30 days overdue.
    #[serde(rename = "1-30")]
    pub days_1_30: Decimal,
    /// 31 to 60 days overdue.
    #[serde(rename = "31-60")]
    pub days_31_60: Decimal,
    /// 61 to 90 days overdue.
    #[serde(rename = "61-90")]
    pub days_61_90: Decimal,
    /// More than 90 days overdue.
    #[serde(rename = "90+")]
    pub days_90_plus: Decimal,
}

impl AgingBuckets {
    /// Sum across all buckets.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.current + self.days_1_30 + self.days_31_60 + self.days_61_90 + self.days_90_plus
    }
}

/// Organization-wide outstanding revenue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingRevenue {
    /// Sum of totals over SENT/OVERDUE invoices.
    pub total: Decimal,
    /// Portion past due.
    pub overdue: Decimal,
    /// Organization base currency.
    pub currency: String,
    /// Aging breakdown of open invoices.
    pub aging_buckets: AgingBuckets,
}

/// Profit and loss over a reporting window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAndLoss {
    /// Sum of PAID invoice totals with `paid_at` in the window.
    pub income: Decimal,
    /// Sum of expense amounts in the window.
    pub expenses: Decimal,
    /// `income - expenses`.
    pub net: Decimal,
    /// Organization base currency.
    pub currency: String,
}
