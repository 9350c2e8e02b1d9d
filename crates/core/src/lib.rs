//! Business logic for Faktura.
//!
//! Pure functions over already-fetched rows, with no web or database
//! dependencies:
//! - Financial aggregation (client balances, aging buckets, profit/loss)
//! - Invoice lifecycle (status transitions, payment application)
//! - Reporting period resolution
//! - Client CSV import/export mapping
//! - Password hashing, slug generation, invoice PDF rendering

pub mod aggregation;
pub mod auth;
pub mod csv;
pub mod invoice;
pub mod pdf;
pub mod period;
pub mod slug;

pub use invoice::{AttachmentVisibility, InvoiceStatus};
pub use period::{DateRange, ReportingPeriod};
