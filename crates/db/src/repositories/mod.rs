//! Repository abstractions for data access.
//!
//! Every query on a business entity filters by the resolved organization
//! id. A row that exists in another organization is indistinguishable from
//! one that does not exist.

pub mod attachment;
pub mod client;
pub mod dashboard;
pub mod expense;
pub mod invoice;
pub mod organization;
pub mod payment;
pub mod tenant;
pub mod user;

pub use attachment::AttachmentRepository;
pub use client::ClientRepository;
pub use dashboard::DashboardRepository;
pub use expense::ExpenseRepository;
pub use invoice::{InvoiceRepository, NewLineItem};
pub use organization::OrganizationRepository;
pub use payment::{NewPayment, PaymentRepository};
pub use tenant::TenantResolver;
pub use user::UserRepository;
