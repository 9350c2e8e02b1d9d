//! Cookie-based authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use faktura_shared::Claims;

/// Name of the httpOnly cookie carrying the signed auth token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Name of the plain cookie recording the selected organization.
pub const ORG_COOKIE: &str = "org_id";

/// The organization-selection cookie, parsed once per request.
#[derive(Debug, Clone, Copy)]
pub struct OrgCookie(pub Option<Uuid>);

/// Authentication middleware that validates the auth token cookie.
///
/// This middleware:
/// 1. Reads the `auth_token` cookie
/// 2. Validates it using the JWT service
/// 3. Stores the claims and the `org_id` cookie value in request
///    extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(AUTH_COOKIE).map(|c| c.value().to_string()) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unauthenticated",
                "message": "Authentication required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(&token) {
        Ok(claims) => {
            let org_cookie = jar
                .get(ORG_COOKIE)
                .and_then(|c| Uuid::parse_str(c.value()).ok());
            request.extensions_mut().insert(claims);
            request.extensions_mut().insert(OrgCookie(org_cookie));
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                faktura_shared::JwtError::Expired => ("token_expired", "Session has expired"),
                _ => ("unauthenticated", "Invalid or malformed session"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for authenticated user claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.0.sub
    }

    /// Returns the organization ID embedded in the token.
    #[must_use]
    pub fn organization_id(&self) -> Uuid {
        self.0.org
    }

    /// Returns the email from the claims.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// Returns the inner claims.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthenticated",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

impl<S> FromRequestParts<S> for OrgCookie
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().copied().unwrap_or(Self(None)))
    }
}
