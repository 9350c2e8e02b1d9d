//! Profit and loss over a reporting window.

use rust_decimal::Decimal;

use crate::invoice::InvoiceStatus;
use crate::period::DateRange;

use super::types::{ExpenseFigures, InvoiceFigures, ProfitAndLoss};

/// Income, expenses, and net over the window.
///
/// Income counts PAID invoices whose `paid_at` falls in the window;
/// invoices without a `paid_at` never count. Expenses count by
/// `expense_date`.
#[must_use]
pub fn profit_and_loss(
    invoices: &[InvoiceFigures],
    expenses: &[ExpenseFigures],
    window: DateRange,
    currency: &str,
) -> ProfitAndLoss {
    let income: Decimal = invoices
        .iter()
        .filter(|inv| inv.status == InvoiceStatus::Paid)
        .filter(|inv| inv.paid_at.is_some_and(|paid| window.contains(paid)))
        .map(|inv| inv.total)
        .sum();

    let expense_total: Decimal = expenses
        .iter()
        .filter(|exp| window.contains(exp.expense_date))
        .map(|exp| exp.amount)
        .sum();

    ProfitAndLoss {
        income,
        expenses: expense_total,
        net: income - expense_total,
        currency: currency.to_string(),
    }
}
