//! Dashboard summary counts.

use chrono::NaiveDate;
use serde::Serialize;

use crate::invoice::{InvoiceStatus, effective_status};

use super::types::InvoiceFigures;

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    /// Invoices stored as DRAFT.
    pub draft_invoices: u64,
    /// Invoices whose effective status is OVERDUE.
    pub overdue_invoices: u64,
    /// Estimates are not implemented; always zero.
    pub open_estimates: u64,
}

/// Counts drafts by stored status and overdue by the derived rule, so the
/// dashboard agrees with every list view.
#[must_use]
pub fn summary_counts(invoices: &[InvoiceFigures], today: NaiveDate) -> SummaryCounts {
    let mut counts = SummaryCounts::default();

    for invoice in invoices {
        match effective_status(invoice.status, invoice.due_date, today) {
            InvoiceStatus::Draft => counts.draft_invoices += 1,
            InvoiceStatus::Overdue => counts.overdue_invoices += 1,
            _ => {}
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn invoice(status: InvoiceStatus, due: Option<NaiveDate>) -> InvoiceFigures {
        InvoiceFigures {
            client_id: Uuid::new_v4(),
            status,
            total: dec!(100),
            amount_paid: dec!(0),
            due_date: due,
            paid_at: None,
        }
    }

    #[test]
    fn test_summary_counts_use_derived_overdue() {
        let today = d(2025, 3, 15);
        let invoices = vec![
            invoice(InvoiceStatus::Draft, None),
            invoice(InvoiceStatus::Draft, Some(d(2025, 1, 1))), // drafts never overdue
            invoice(InvoiceStatus::Sent, Some(d(2025, 3, 1))),  // derived overdue
            invoice(InvoiceStatus::Overdue, None),              // stored overdue
            invoice(InvoiceStatus::Sent, Some(d(2025, 4, 1))),
            invoice(InvoiceStatus::Paid, Some(d(2025, 1, 1))),
        ];

        let counts = summary_counts(&invoices, today);
        assert_eq!(counts.draft_invoices, 2);
        assert_eq!(counts.overdue_invoices, 2);
        assert_eq!(counts.open_estimates, 0);
    }
}
