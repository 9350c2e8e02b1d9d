//! Authentication routes for signup, login, and logout.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::{AUTH_COOKIE, ORG_COOKIE};
use faktura_core::auth::{hash_password, verify_password};
use faktura_db::{TenantResolver, UserRepository};
use faktura_shared::auth::{LoginRequest, SignupRequest, UserResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// POST /auth/signup - Create user, organization, and membership.
async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> impl IntoResponse {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return validation_error("A valid email is required").into_response();
    }
    if payload.password.len() < 8 {
        return validation_error("Password must be at least 8 characters").into_response();
    }
    let name = payload.name.trim();
    if name.is_empty() {
        return validation_error("Name is required").into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_email(&email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "conflict",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "Database error during signup");
            return internal_error("An error occurred during signup").into_response();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return internal_error("An error occurred during signup").into_response();
        }
    };

    let (user, org) = match user_repo
        .create_with_organization(&email, &password_hash, name, payload.company_name.as_deref())
        .await
    {
        Ok(created) => created,
        Err(e) => {
            error!(error = %e, "Failed to create user and organization");
            return internal_error("An error occurred during signup").into_response();
        }
    };

    let token = match state.jwt_service.generate_token(user.id, org.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate auth token");
            return internal_error("An error occurred during signup").into_response();
        }
    };

    info!(user_id = %user.id, organization_id = %org.id, "user signed up");

    let jar = with_session_cookies(jar, token, org.id);
    (
        jar,
        (
            StatusCode::CREATED,
            Json(json!({
                "user": UserResponse {
                    id: user.id,
                    email: user.email,
                    name: user.name,
                    organization_id: org.id,
                }
            })),
        ),
    )
        .into_response()
}

/// POST /auth/login - Verify credentials and set the session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(payload.email.trim()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials().into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login").into_response();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt");
            return invalid_credentials().into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login").into_response();
        }
    }

    let resolver = TenantResolver::new((*state.db).clone());
    let org_id = match resolver.resolve(&user, None).await {
        Ok(org_id) => org_id,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "tenant resolution failed during login");
            return internal_error("An error occurred during login").into_response();
        }
    };

    let token = match state.jwt_service.generate_token(user.id, org_id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate auth token");
            return internal_error("An error occurred during login").into_response();
        }
    };

    info!(user_id = %user.id, organization_id = %org_id, "user logged in");

    let jar = with_session_cookies(jar, token, org_id);
    (
        jar,
        Json(json!({
            "user": UserResponse {
                id: user.id,
                email: user.email,
                name: user.name,
                organization_id: org_id,
            }
        })),
    )
        .into_response()
}

/// POST /auth/logout - Clear the session cookies.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .remove(Cookie::build(AUTH_COOKIE).path("/"))
        .remove(Cookie::build(ORG_COOKIE).path("/"));
    (jar, Json(json!({ "success": true })))
}

/// Sets the httpOnly auth cookie and the plain org-selection cookie.
pub fn with_session_cookies(jar: CookieJar, token: String, org_id: Uuid) -> CookieJar {
    let auth = Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(7))
        .build();
    let org = Cookie::build((ORG_COOKIE, org_id.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(7))
        .build();
    jar.add(auth).add(org)
}

fn validation_error(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "validation_error", "message": message })),
    )
}

fn invalid_credentials() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
}

fn internal_error(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error", "message": message })),
    )
}
