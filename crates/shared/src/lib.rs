//! Shared types, errors, and configuration for Faktura.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Auth token claims and request/response payloads
//! - JWT signing and validation
//! - Email service (logs instead of sending when SMTP is disabled)
//! - Pagination types for list endpoints
//! - Configuration management

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use email::EmailService;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
