//! Invoice lifecycle: statuses, transitions, payment application.

pub mod lifecycle;
pub mod status;

pub use lifecycle::{PaymentOutcome, amount_due, apply_payment, send_transition};
pub use status::{AttachmentVisibility, InvoiceStatus, effective_status};
