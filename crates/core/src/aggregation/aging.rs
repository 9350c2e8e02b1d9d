//! Aging buckets and outstanding revenue.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{AgingBuckets, InvoiceFigures, OutstandingRevenue};

/// Buckets open-invoice totals by days overdue.
///
/// Eligible invoices are open (SENT/OVERDUE) ones with a due date, the
/// same population [`outstanding_revenue`] sums, so the buckets never
/// exceed the outstanding total. Each invoice's `total` lands in exactly
/// one bucket.
#[must_use]
pub fn aging_buckets(invoices: &[InvoiceFigures], today: NaiveDate) -> AgingBuckets {
    let mut buckets = AgingBuckets::default();

    for invoice in invoices {
        if !invoice.status.is_open() {
            continue;
        }
        let Some(due_date) = invoice.due_date else {
            continue;
        };

        let days_overdue = (today - due_date).num_days();
        let bucket = match days_overdue {
            i64::MIN..=0 => &mut buckets.current,
            1..=30 => &mut buckets.days_1_30,
            31..=60 => &mut buckets.days_31_60,
            61..=90 => &mut buckets.days_61_90,
            _ => &mut buckets.days_90_plus,
        };
        *bucket += invoice.total;
    }

    buckets
}

/// Organization-wide outstanding revenue over SENT/OVERDUE invoices.
///
/// `overdue` is the subset with a due date strictly before `today`. The
/// currency is the organization base currency; totals are not
/// multi-currency aggregated.
#[must_use]
pub fn outstanding_revenue(
    invoices: &[InvoiceFigures],
    today: NaiveDate,
    currency: &str,
) -> OutstandingRevenue {
    let mut total = Decimal::ZERO;
    let mut overdue = Decimal::ZERO;

    for invoice in invoices {
        if !invoice.status.is_open() {
            continue;
        }
        total += invoice.total;
        if invoice.due_date.is_some_and(|due| due < today) {
            overdue += invoice.total;
        }
    }

    OutstandingRevenue {
        total,
        overdue,
        currency: currency.to_string(),
        aging_buckets: aging_buckets(invoices, today),
    }
}
