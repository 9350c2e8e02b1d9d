//! Invoice status and the derived-overdue rule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Invoice status.
///
/// OVERDUE is a display state derived on read (see [`effective_status`]);
/// the system never writes it back. Stored OVERDUE rows from imported data
/// are still honored everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    /// Not yet sent to the client.
    Draft,
    /// Sent, awaiting payment.
    Sent,
    /// Past due. Derived from SENT on read, or stored in imported data.
    Overdue,
    /// Fully paid.
    Paid,
    /// Cancelled.
    Void,
}

impl InvoiceStatus {
    /// The wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Overdue => "OVERDUE",
            Self::Paid => "PAID",
            Self::Void => "VOID",
        }
    }

    /// Parses a status string, case-sensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(Self::Draft),
            "SENT" => Some(Self::Sent),
            "OVERDUE" => Some(Self::Overdue),
            "PAID" => Some(Self::Paid),
            "VOID" => Some(Self::Void),
            _ => None,
        }
    }

    /// Whether the invoice still awaits money (not PAID, not VOID).
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Sent | Self::Overdue)
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single source of truth for overdue classification.
///
/// SENT with a due date strictly before `today` reads as OVERDUE. Every
/// list, dashboard, and balance path must go through this function so the
/// classification never diverges between views.
#[must_use]
pub fn effective_status(
    stored: InvoiceStatus,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> InvoiceStatus {
    match (stored, due_date) {
        (InvoiceStatus::Sent, Some(due)) if due < today => InvoiceStatus::Overdue,
        _ => stored,
    }
}

/// Attachment visibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentVisibility {
    /// Visible regardless of invoice status.
    AlwaysViewable,
    /// Hidden until the invoice's effective status is PAID.
    LockedUntilPaid,
}

impl AttachmentVisibility {
    /// Whether an attachment with this policy may be served for an invoice
    /// in the given effective status. Enforced server-side.
    #[must_use]
    pub const fn is_visible(self, invoice_status: InvoiceStatus) -> bool {
        match self {
            Self::AlwaysViewable => true,
            Self::LockedUntilPaid => matches!(invoice_status, InvoiceStatus::Paid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(InvoiceStatus::Sent, Some((2025, 3, 14)), InvoiceStatus::Overdue)]
    #[case(InvoiceStatus::Sent, Some((2025, 3, 15)), InvoiceStatus::Sent)] // due today is not overdue
    #[case(InvoiceStatus::Sent, Some((2025, 4, 1)), InvoiceStatus::Sent)]
    #[case(InvoiceStatus::Sent, None, InvoiceStatus::Sent)]
    #[case(InvoiceStatus::Draft, Some((2024, 1, 1)), InvoiceStatus::Draft)]
    #[case(InvoiceStatus::Paid, Some((2024, 1, 1)), InvoiceStatus::Paid)]
    #[case(InvoiceStatus::Void, Some((2024, 1, 1)), InvoiceStatus::Void)]
    #[case(InvoiceStatus::Overdue, None, InvoiceStatus::Overdue)]
    fn test_effective_status(
        #[case] stored: InvoiceStatus,
        #[case] due: Option<(i32, u32, u32)>,
        #[case] expected: InvoiceStatus,
    ) {
        let today = d(2025, 3, 15);
        let due = due.map(|(y, m, day)| d(y, m, day));
        assert_eq!(effective_status(stored, due, today), expected);
    }

    #[test]
    fn test_is_open() {
        assert!(InvoiceStatus::Sent.is_open());
        assert!(InvoiceStatus::Overdue.is_open());
        assert!(!InvoiceStatus::Draft.is_open());
        assert!(!InvoiceStatus::Paid.is_open());
        assert!(!InvoiceStatus::Void.is_open());
    }

    #[test]
    fn test_parse_roundtrip() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Sent,
            InvoiceStatus::Overdue,
            InvoiceStatus::Paid,
            InvoiceStatus::Void,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::parse("draft"), None);
    }

    #[test]
    fn test_locked_attachment_visible_only_when_paid() {
        let locked = AttachmentVisibility::LockedUntilPaid;
        assert!(locked.is_visible(InvoiceStatus::Paid));
        assert!(!locked.is_visible(InvoiceStatus::Sent));
        assert!(!locked.is_visible(InvoiceStatus::Overdue));
        assert!(AttachmentVisibility::AlwaysViewable.is_visible(InvoiceStatus::Draft));
    }
}
