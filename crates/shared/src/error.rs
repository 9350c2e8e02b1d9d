//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Expected errors (validation, not-found, forbidden) are returned to the
/// client as structured JSON. `NotFound` is deliberately indistinguishable
/// from "exists in another organization" so cross-tenant existence never
/// leaks.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid session.
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated but not allowed (e.g. not a member of the organization).
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found within the resolved organization's scope.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed request field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthenticated(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Unauthenticated(String::new()).error_code(),
            "unauthenticated"
        );
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "forbidden");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "not_found");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "validation_error"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "conflict");
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "database_error"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "internal_error"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Unauthenticated("msg".into()).to_string(),
            "Not authenticated: msg"
        );
        assert_eq!(
            AppError::NotFound("Invoice".into()).to_string(),
            "Not found: Invoice"
        );
        assert_eq!(
            AppError::Validation("name is required".into()).to_string(),
            "Validation error: name is required"
        );
    }
}
