//! Per-client balance rollups.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::invoice::{InvoiceStatus, effective_status};

use super::types::{ClientBalances, InvoiceFigures};

/// Rolls one client's invoices up into draft/outstanding/overdue totals.
///
/// DRAFT totals land in `draft`. SENT/OVERDUE invoices contribute their
/// remaining balance (floored at zero) to `outstanding`, and to `overdue`
/// as well when the effective status is OVERDUE. PAID and VOID contribute
/// nothing. Date comparison is calendar-day only.
#[must_use]
pub fn client_balances(invoices: &[InvoiceFigures], today: NaiveDate) -> ClientBalances {
    let mut balances = ClientBalances::default();

    for invoice in invoices {
        match invoice.status {
            InvoiceStatus::Draft => balances.draft += invoice.total,
            InvoiceStatus::Sent | InvoiceStatus::Overdue => {
                let remaining = (invoice.total - invoice.amount_paid).max(Decimal::ZERO);
                balances.outstanding += remaining;
                let effective = effective_status(invoice.status, invoice.due_date, today);
                if effective == InvoiceStatus::Overdue {
                    balances.overdue += remaining;
                }
            }
            InvoiceStatus::Paid | InvoiceStatus::Void => {}
        }
    }

    balances
}
