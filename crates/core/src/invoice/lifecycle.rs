//! Status transition decisions.
//!
//! These functions decide what a transition does; the repository layer
//! executes the decision inside a transaction.

use rust_decimal::Decimal;

use super::status::InvoiceStatus;

/// Outcome of applying a payment to an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// `amount_paid` after the increment.
    pub new_amount_paid: Decimal,
    /// Whether the invoice flips to PAID (and `paid_at` gets stamped).
    pub becomes_paid: bool,
}

/// Decides the effect of a payment of `amount` against an invoice.
///
/// The invoice flips to PAID when the post-increment `amount_paid` reaches
/// the total, regardless of prior status (an OVERDUE invoice paid in full
/// becomes PAID). Otherwise status is left untouched.
#[must_use]
pub fn apply_payment(total: Decimal, amount_paid: Decimal, amount: Decimal) -> PaymentOutcome {
    let new_amount_paid = amount_paid + amount;
    PaymentOutcome {
        new_amount_paid,
        becomes_paid: new_amount_paid >= total,
    }
}

/// Decides the send-email status transition.
///
/// Only DRAFT moves to SENT; every other status is a no-op (the email can
/// still go out, the status just stays put).
#[must_use]
pub fn send_transition(status: InvoiceStatus) -> Option<InvoiceStatus> {
    match status {
        InvoiceStatus::Draft => Some(InvoiceStatus::Sent),
        _ => None,
    }
}

/// Remaining balance on an invoice. Never floored: an overpaid invoice
/// legitimately reports a negative amount due.
#[must_use]
pub fn amount_due(total: Decimal, amount_paid: Decimal) -> Decimal {
    total - amount_paid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_payment_keeps_status() {
        let outcome = apply_payment(dec!(200), dec!(0), dec!(50));
        assert_eq!(outcome.new_amount_paid, dec!(50));
        assert!(!outcome.becomes_paid);
    }

    #[test]
    fn test_exact_payment_flips_to_paid() {
        let outcome = apply_payment(dec!(200), dec!(150), dec!(50));
        assert_eq!(outcome.new_amount_paid, dec!(200));
        assert!(outcome.becomes_paid);
    }

    #[test]
    fn test_overpayment_flips_to_paid() {
        let outcome = apply_payment(dec!(200), dec!(0), dec!(250));
        assert_eq!(outcome.new_amount_paid, dec!(250));
        assert!(outcome.becomes_paid);
    }

    #[test]
    fn test_sequential_payments_sum_to_total_flip_once() {
        // Three payments covering the total exactly; only the last flips.
        let total = dec!(300);
        let first = apply_payment(total, dec!(0), dec!(100));
        assert!(!first.becomes_paid);
        let second = apply_payment(total, first.new_amount_paid, dec!(100));
        assert!(!second.becomes_paid);
        let third = apply_payment(total, second.new_amount_paid, dec!(100));
        assert!(third.becomes_paid);
        assert_eq!(third.new_amount_paid, total);
    }

    #[test]
    fn test_send_only_from_draft() {
        assert_eq!(
            send_transition(InvoiceStatus::Draft),
            Some(InvoiceStatus::Sent)
        );
        assert_eq!(send_transition(InvoiceStatus::Sent), None);
        assert_eq!(send_transition(InvoiceStatus::Overdue), None);
        assert_eq!(send_transition(InvoiceStatus::Paid), None);
        assert_eq!(send_transition(InvoiceStatus::Void), None);
    }

    #[test]
    fn test_amount_due_can_go_negative() {
        assert_eq!(amount_due(dec!(100), dec!(40)), dec!(60));
        assert_eq!(amount_due(dec!(100), dec!(120)), dec!(-20));
    }
}
