//! Organization routes: listing memberships, creating organizations, and
//! switching the active one.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::{AuthUser, OrgCookie};
use crate::routes::auth::with_session_cookies;
use crate::tenant::internal_error;
use faktura_db::{OrganizationRepository, TenantResolver, UserRepository};

/// Creates the organization router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", get(list).post(create))
        .route("/organizations/select", post(select))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectRequest {
    organization_id: Uuid,
}

/// GET /organizations - The caller's organizations and which one is active.
/// Does not auto-provision.
async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthenticated",
                    "message": "Account no longer exists"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to load user");
            return internal_error().into_response();
        }
    };

    let org_repo = OrganizationRepository::new((*state.db).clone());
    let memberships = match org_repo.memberships_for_user(user.id).await {
        Ok(memberships) => memberships,
        Err(e) => {
            error!(error = %e, "Failed to load memberships");
            return internal_error().into_response();
        }
    };

    let resolver = TenantResolver::new((*state.db).clone());
    let cookie_org = org_cookie.0.or(Some(auth.organization_id()));
    let active = match resolver.resolve_existing(&user, cookie_org).await {
        Ok(active) => active,
        Err(e) => {
            error!(error = %e, "Failed to resolve active organization");
            return internal_error().into_response();
        }
    };

    let organizations: Vec<_> = memberships
        .into_iter()
        .map(|(membership, org)| {
            let mut value = json!(org);
            value["role"] = json!(membership.role);
            value
        })
        .collect();

    Json(json!({
        "organizations": organizations,
        "activeOrganizationId": active,
    }))
    .into_response()
}

/// POST /organizations - Create an organization owned by the caller and
/// make it the active one.
async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    Json(payload): Json<CreateRequest>,
) -> impl IntoResponse {
    let name = payload.name.trim();
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "An organization name is required"
            })),
        )
            .into_response();
    }

    let org_repo = OrganizationRepository::new((*state.db).clone());
    let org = match org_repo.create_with_owner(name, auth.user_id()).await {
        Ok(org) => org,
        Err(e) => {
            error!(error = %e, "Failed to create organization");
            return internal_error().into_response();
        }
    };

    let token = match state
        .jwt_service
        .generate_token(auth.user_id(), org.id, auth.email())
    {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate auth token");
            return internal_error().into_response();
        }
    };

    info!(user_id = %auth.user_id(), organization_id = %org.id, "organization created");

    let jar = with_session_cookies(jar, token, org.id);
    (jar, (StatusCode::CREATED, Json(json!(org)))).into_response()
}

/// POST /organizations/select - Switch the active organization. Membership
/// is verified; a foreign organization id is rejected without touching the
/// stored default.
async fn select(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    Json(payload): Json<SelectRequest>,
) -> impl IntoResponse {
    let org_repo = OrganizationRepository::new((*state.db).clone());
    match org_repo
        .is_member(payload.organization_id, auth.user_id())
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "forbidden",
                    "message": "Not a member of this organization"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to check membership");
            return internal_error().into_response();
        }
    }

    let user_repo = UserRepository::new((*state.db).clone());
    if let Err(e) = user_repo
        .set_default_organization(auth.user_id(), payload.organization_id)
        .await
    {
        error!(error = %e, "Failed to set default organization");
        return internal_error().into_response();
    }

    let token = match state.jwt_service.generate_token(
        auth.user_id(),
        payload.organization_id,
        auth.email(),
    ) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate auth token");
            return internal_error().into_response();
        }
    };

    info!(user_id = %auth.user_id(), organization_id = %payload.organization_id, "active organization switched");

    let jar = with_session_cookies(jar, token, payload.organization_id);
    (
        jar,
        Json(json!({ "activeOrganizationId": payload.organization_id })),
    )
        .into_response()
}
