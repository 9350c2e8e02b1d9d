//! JWT signing and validation for the auth token cookie.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// JWT errors.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token is expired.
    #[error("Token expired")]
    Expired,
    /// Token is invalid.
    #[error("Invalid token: {0}")]
    Invalid(String),
    /// Token could not be created.
    #[error("Token creation failed: {0}")]
    Creation(String),
}

/// Signs and validates auth tokens (HS256).
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_days: i64,
}

impl JwtService {
    /// Creates a new service from the shared secret.
    #[must_use]
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_days,
        }
    }

    /// Generates an auth token for the given user and organization.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Creation` if signing fails.
    pub fn generate_token(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        email: &str,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            org: organization_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.expiry_days)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Creation(e.to_string()))
    }

    /// Validates a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` for expired tokens, `JwtError::Invalid`
    /// for anything else that fails validation.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret-key-for-unit-tests", 7)
    }

    #[test]
    fn test_generate_and_validate_roundtrip() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let token = svc.generate_token(user_id, org_id, "user@example.com").unwrap();
        let claims = svc.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.org, org_id);
        assert_eq!(claims.email, "user@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_expires_in_configured_days() {
        let svc = service();
        let token = svc
            .generate_token(Uuid::new_v4(), Uuid::new_v4(), "a@b.c")
            .unwrap();
        let claims = svc.validate_token(&token).unwrap();

        let seven_days = 7 * 24 * 60 * 60;
        assert_eq!(claims.exp - claims.iat, seven_days);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let svc = service();
        assert!(matches!(
            svc.validate_token("not-a-token"),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let token = svc
            .generate_token(Uuid::new_v4(), Uuid::new_v4(), "a@b.c")
            .unwrap();

        let other = JwtService::new("a-different-secret", 7);
        assert!(other.validate_token(&token).is_err());
    }
}
