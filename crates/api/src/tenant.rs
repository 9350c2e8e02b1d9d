//! Per-request tenant resolution helper.
//!
//! Every data-access handler goes through [`active_org`]; no handler
//! trusts a raw header or the token's org claim without a membership
//! check.

use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

use crate::AppState;
use crate::middleware::{AuthUser, OrgCookie};
use faktura_db::{TenantResolver, UserRepository, entities::users};

/// Resolves the authenticated user's row and active organization id.
///
/// The selection cookie takes precedence, then the token's org claim,
/// then the stored default, then the oldest membership; a user with no
/// membership gets a default organization provisioned.
///
/// # Errors
///
/// Returns a ready-to-send error response when the session user no longer
/// exists or the database fails.
pub async fn active_org(
    state: &AppState,
    auth: &AuthUser,
    org_cookie: OrgCookie,
) -> Result<(users::Model, uuid::Uuid), (StatusCode, Json<Value>)> {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthenticated",
                    "message": "Session user no longer exists"
                })),
            ));
        }
        Err(e) => {
            tracing::error!(error = %e, "database error resolving session user");
            return Err(internal_error());
        }
    };

    let resolver = TenantResolver::new((*state.db).clone());
    let cookie_org = org_cookie.0.or(Some(auth.organization_id()));

    match resolver.resolve(&user, cookie_org).await {
        Ok(org_id) => Ok((user, org_id)),
        Err(e) => {
            tracing::error!(error = %e, user_id = %user.id, "tenant resolution failed");
            Err(internal_error())
        }
    }
}

/// Generic masked 500 response.
#[must_use]
pub fn internal_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An unexpected error occurred"
        })),
    )
}
