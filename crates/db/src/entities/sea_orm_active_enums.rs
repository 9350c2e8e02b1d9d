//! Database enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership role within an organization.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "organization_role")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrganizationRole {
    /// Created the organization; full control.
    #[sea_orm(string_value = "OWNER")]
    Owner,
    /// Administrative access.
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Regular member.
    #[sea_orm(string_value = "STAFF")]
    Staff,
}

/// Stored invoice status. OVERDUE is derived on read and never written by
/// the system; it exists here for imported data.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    /// Not yet sent.
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Sent, awaiting payment.
    #[sea_orm(string_value = "SENT")]
    Sent,
    /// Past due (stored form; normally derived).
    #[sea_orm(string_value = "OVERDUE")]
    Overdue,
    /// Fully paid.
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Cancelled.
    #[sea_orm(string_value = "VOID")]
    Void,
}

impl From<InvoiceStatus> for faktura_core::InvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Sent => Self::Sent,
            InvoiceStatus::Overdue => Self::Overdue,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Void => Self::Void,
        }
    }
}

impl From<faktura_core::InvoiceStatus> for InvoiceStatus {
    fn from(status: faktura_core::InvoiceStatus) -> Self {
        match status {
            faktura_core::InvoiceStatus::Draft => Self::Draft,
            faktura_core::InvoiceStatus::Sent => Self::Sent,
            faktura_core::InvoiceStatus::Overdue => Self::Overdue,
            faktura_core::InvoiceStatus::Paid => Self::Paid,
            faktura_core::InvoiceStatus::Void => Self::Void,
        }
    }
}

/// Attachment visibility policy.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attachment_visibility")]
#[serde(rename_all = "snake_case")]
pub enum AttachmentVisibility {
    /// Visible regardless of invoice status.
    #[sea_orm(string_value = "always_viewable")]
    AlwaysViewable,
    /// Hidden until the invoice is paid.
    #[sea_orm(string_value = "locked_until_paid")]
    LockedUntilPaid,
}

impl From<AttachmentVisibility> for faktura_core::AttachmentVisibility {
    fn from(visibility: AttachmentVisibility) -> Self {
        match visibility {
            AttachmentVisibility::AlwaysViewable => Self::AlwaysViewable,
            AttachmentVisibility::LockedUntilPaid => Self::LockedUntilPaid,
        }
    }
}
