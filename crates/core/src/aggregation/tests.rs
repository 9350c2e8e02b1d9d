use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::invoice::InvoiceStatus;
use crate::period::ReportingPeriod;

use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn invoice(
    status: InvoiceStatus,
    total: Decimal,
    amount_paid: Decimal,
    due_date: Option<NaiveDate>,
) -> InvoiceFigures {
    InvoiceFigures {
        client_id: Uuid::new_v4(),
        status,
        total,
        amount_paid,
        due_date,
        paid_at: None,
    }
}

#[test]
fn test_client_balances_mixed_scenario() {
    // DRAFT $100, SENT $200 due yesterday, SENT $50 due next month, PAID $300.
    let today = d(2025, 3, 15);
    let invoices = vec![
        invoice(InvoiceStatus::Draft, dec!(100), dec!(0), None),
        invoice(InvoiceStatus::Sent, dec!(200), dec!(0), Some(d(2025, 3, 14))),
        invoice(InvoiceStatus::Sent, dec!(50), dec!(0), Some(d(2025, 4, 14))),
        invoice(InvoiceStatus::Paid, dec!(300), dec!(300), Some(d(2025, 2, 1))),
    ];

    let balances = client_balances(&invoices, today);
    assert_eq!(balances.draft, dec!(100));
    assert_eq!(balances.outstanding, dec!(250));
    assert_eq!(balances.overdue, dec!(200));
}

#[test]
fn test_overdue_invoice_counts_in_both_outstanding_and_overdue() {
    let today = d(2025, 3, 15);
    let invoices = vec![invoice(
        InvoiceStatus::Sent,
        dec!(120),
        dec!(20),
        Some(d(2025, 3, 1)),
    )];

    let balances = client_balances(&invoices, today);
    assert_eq!(balances.outstanding, dec!(100));
    assert_eq!(balances.overdue, dec!(100));
}

#[test]
fn test_stored_overdue_counts_even_without_due_date() {
    let today = d(2025, 3, 15);
    let invoices = vec![invoice(InvoiceStatus::Overdue, dec!(80), dec!(0), None)];

    let balances = client_balances(&invoices, today);
    assert_eq!(balances.overdue, dec!(80));
}

#[test]
fn test_overpaid_open_invoice_contributes_zero() {
    let today = d(2025, 3, 15);
    let invoices = vec![invoice(
        InvoiceStatus::Sent,
        dec!(100),
        dec!(150),
        Some(d(2025, 1, 1)),
    )];

    let balances = client_balances(&invoices, today);
    assert_eq!(balances.outstanding, dec!(0));
    assert_eq!(balances.overdue, dec!(0));
}

#[test]
fn test_void_contributes_nothing() {
    let today = d(2025, 3, 15);
    let invoices = vec![invoice(
        InvoiceStatus::Void,
        dec!(999),
        dec!(0),
        Some(d(2025, 1, 1)),
    )];

    assert_eq!(client_balances(&invoices, today), ClientBalances::default());
}

#[test]
fn test_aging_bucket_boundaries() {
    let today = d(2025, 3, 31);
    let case = |days_overdue: u64| {
        let due = today.checked_sub_days(Days::new(days_overdue)).unwrap();
        let invoices = vec![invoice(InvoiceStatus::Sent, dec!(10), dec!(0), Some(due))];
        aging_buckets(&invoices, today)
    };

    assert_eq!(case(0).current, dec!(10));
    assert_eq!(case(1).days_1_30, dec!(10));
    assert_eq!(case(30).days_1_30, dec!(10));
    assert_eq!(case(31).days_31_60, dec!(10));
    assert_eq!(case(60).days_31_60, dec!(10));
    assert_eq!(case(61).days_61_90, dec!(10));
    assert_eq!(case(90).days_61_90, dec!(10));
    assert_eq!(case(91).days_90_plus, dec!(10));
}

#[test]
fn test_aging_not_yet_due_is_current() {
    let today = d(2025, 3, 15);
    let invoices = vec![invoice(
        InvoiceStatus::Sent,
        dec!(42),
        dec!(0),
        Some(d(2025, 4, 1)),
    )];

    let buckets = aging_buckets(&invoices, today);
    assert_eq!(buckets.current, dec!(42));
    assert_eq!(buckets.total(), dec!(42));
}

#[test]
fn test_aging_skips_non_open_and_undated() {
    let today = d(2025, 3, 15);
    let invoices = vec![
        invoice(InvoiceStatus::Paid, dec!(100), dec!(100), Some(d(2025, 1, 1))),
        invoice(InvoiceStatus::Void, dec!(100), dec!(0), Some(d(2025, 1, 1))),
        invoice(InvoiceStatus::Draft, dec!(100), dec!(0), Some(d(2025, 1, 1))),
        invoice(InvoiceStatus::Sent, dec!(100), dec!(0), None),
    ];

    assert_eq!(aging_buckets(&invoices, today).total(), dec!(0));
}

#[test]
fn test_past_due_draft_stays_out_of_aging_buckets() {
    // A draft past its due date must not inflate the buckets beyond the
    // outstanding total.
    let today = d(2025, 3, 15);
    let invoices = vec![
        invoice(InvoiceStatus::Sent, dec!(100), dec!(0), Some(d(2025, 3, 1))),
        invoice(InvoiceStatus::Draft, dec!(500), dec!(0), Some(d(2025, 1, 1))),
    ];

    let revenue = outstanding_revenue(&invoices, today, "USD");
    assert_eq!(revenue.total, dec!(100));
    assert_eq!(revenue.aging_buckets.total(), dec!(100));
    assert_eq!(revenue.aging_buckets.days_1_30, dec!(100));
}

#[test]
fn test_outstanding_revenue() {
    let today = d(2025, 3, 15);
    let invoices = vec![
        invoice(InvoiceStatus::Sent, dec!(200), dec!(0), Some(d(2025, 3, 1))),
        invoice(InvoiceStatus::Sent, dec!(50), dec!(0), Some(d(2025, 4, 1))),
        invoice(InvoiceStatus::Draft, dec!(75), dec!(0), None),
        invoice(InvoiceStatus::Paid, dec!(300), dec!(300), Some(d(2025, 2, 1))),
    ];

    let revenue = outstanding_revenue(&invoices, today, "USD");
    assert_eq!(revenue.total, dec!(250));
    assert_eq!(revenue.overdue, dec!(200));
    assert_eq!(revenue.currency, "USD");
}

#[test]
fn test_profit_and_loss_window_filtering() {
    let today = d(2025, 3, 15);
    let window = ReportingPeriod::ThisMonth.resolve(today);

    let mut inside = invoice(InvoiceStatus::Paid, dec!(500), dec!(500), None);
    inside.paid_at = Some(d(2025, 3, 10));
    let mut outside = invoice(InvoiceStatus::Paid, dec!(400), dec!(400), None);
    outside.paid_at = Some(d(2025, 2, 10));
    let unpaid = invoice(InvoiceStatus::Sent, dec!(999), dec!(0), None);

    let expenses = vec![
        ExpenseFigures { amount: dec!(120), expense_date: d(2025, 3, 5) },
        ExpenseFigures { amount: dec!(80), expense_date: d(2025, 2, 20) },
    ];

    let result = profit_and_loss(&[inside, outside, unpaid], &expenses, window, "USD");
    assert_eq!(result.income, dec!(500));
    assert_eq!(result.expenses, dec!(120));
    assert_eq!(result.net, dec!(380));
}

#[test]
fn test_paid_without_paid_at_never_counts_as_income() {
    let today = d(2025, 3, 15);
    let window = ReportingPeriod::ThisYear.resolve(today);
    let paid_undated = invoice(InvoiceStatus::Paid, dec!(500), dec!(500), None);

    let result = profit_and_loss(&[paid_undated], &[], window, "USD");
    assert_eq!(result.income, dec!(0));
}

fn arb_invoice(today: NaiveDate) -> impl Strategy<Value = InvoiceFigures> {
    (0usize..5, 0i64..1_000_000, -120i64..400, proptest::bool::ANY).prop_map(
        move |(status_idx, cents, days_overdue, has_due)| {
            let status = [
                InvoiceStatus::Draft,
                InvoiceStatus::Sent,
                InvoiceStatus::Overdue,
                InvoiceStatus::Paid,
                InvoiceStatus::Void,
            ][status_idx];
            let due_date = has_due.then(|| today - chrono::Duration::days(days_overdue));
            InvoiceFigures {
                client_id: Uuid::new_v4(),
                status,
                total: Decimal::new(cents, 2),
                amount_paid: Decimal::ZERO,
                due_date,
                paid_at: None,
            }
        },
    )
}

proptest! {
    // Every eligible invoice lands in exactly one bucket: the buckets sum
    // to the eligible total, no double counting, no loss.
    #[test]
    fn prop_aging_buckets_partition_eligible_totals(
        invoices in proptest::collection::vec(
            arb_invoice(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()),
            0..40,
        )
    ) {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let buckets = aging_buckets(&invoices, today);

        let eligible: Decimal = invoices
            .iter()
            .filter(|inv| inv.status.is_open())
            .filter(|inv| inv.due_date.is_some())
            .map(|inv| inv.total)
            .sum();

        prop_assert_eq!(buckets.total(), eligible);
    }

    // Overdue never exceeds outstanding, and drafts never leak into either.
    #[test]
    fn prop_client_balances_overdue_bounded_by_outstanding(
        invoices in proptest::collection::vec(
            arb_invoice(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()),
            0..40,
        )
    ) {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let balances = client_balances(&invoices, today);

        prop_assert!(balances.overdue <= balances.outstanding);
        prop_assert!(balances.draft >= Decimal::ZERO);

        let draft_total: Decimal = invoices
            .iter()
            .filter(|inv| inv.status == InvoiceStatus::Draft)
            .map(|inv| inv.total)
            .sum();
        prop_assert_eq!(balances.draft, draft_total);
    }
}
