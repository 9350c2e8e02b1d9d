//! `SeaORM` entity definitions.

pub mod clients;
pub mod expenses;
pub mod invoice_attachments;
pub mod invoice_line_items;
pub mod invoices;
pub mod memberships;
pub mod organizations;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod users;
