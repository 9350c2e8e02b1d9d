//! Client routes: list, CRUD, bulk actions, CSV export/import.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::{AuthUser, OrgCookie};
use crate::tenant::{active_org, internal_error};
use faktura_core::aggregation::{ClientBalances, client_balances};
use faktura_core::csv::{ClientCsvFields, export_clients, import_clients};
use faktura_db::{ClientRepository, DashboardRepository, entities::clients};
use faktura_shared::types::{PageRequest, PageResponse};

/// Creates the client router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list).post(create))
        .route("/clients/bulk", post(bulk))
        .route("/clients/export", get(export))
        .route("/clients/import", post(import))
        .route("/clients/{id}", get(detail).patch(update))
}

/// Query parameters for the client list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    include_archived: bool,
}

/// Create/update payload. On PATCH, absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientPayload {
    display_name: Option<String>,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    business_phone: Option<String>,
    mobile_phone: Option<String>,
    address_line1: Option<String>,
    address_line2: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    notes: Option<String>,
    is_active: Option<bool>,
}

/// Bulk action payload.
#[derive(Debug, Deserialize)]
struct BulkRequest {
    action: String,
    ids: Vec<Uuid>,
}

/// GET /clients - Paginated list with per-client balances.
async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Query(query): Query<ListQuery>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let repo = ClientRepository::new((*state.db).clone());
    let (rows, total) = match repo
        .list(org_id, query.q.as_deref(), query.include_archived, &page)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Failed to list clients");
            return internal_error().into_response();
        }
    };

    let dashboard = DashboardRepository::new((*state.db).clone());
    let figures = match dashboard.invoice_figures(org_id).await {
        Ok(figures) => figures,
        Err(e) => {
            error!(error = %e, "Failed to load invoice figures");
            return internal_error().into_response();
        }
    };

    let today = Utc::now().date_naive();
    let mut by_client: HashMap<Uuid, Vec<_>> = HashMap::new();
    for figure in figures {
        by_client.entry(figure.client_id).or_default().push(figure);
    }

    let items: Vec<_> = rows
        .into_iter()
        .map(|client| {
            let balances = by_client
                .get(&client.id)
                .map_or_else(ClientBalances::default, |invoices| {
                    client_balances(invoices, today)
                });
            let mut value = json!(client);
            value["balances"] = json!(balances);
            value
        })
        .collect();

    Json(PageResponse::new(items, &page, total)).into_response()
}

/// POST /clients - Create a client.
async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Json(payload): Json<ClientPayload>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let display_name = payload
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .or_else(|| {
            payload
                .company
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        });

    let Some(display_name) = display_name else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "A display name or company is required"
            })),
        )
            .into_response();
    };

    let model = clients::ActiveModel {
        display_name: Set(display_name),
        company: Set(payload.company),
        email: Set(payload.email),
        phone: Set(payload.phone),
        business_phone: Set(payload.business_phone),
        mobile_phone: Set(payload.mobile_phone),
        address_line1: Set(payload.address_line1),
        address_line2: Set(payload.address_line2),
        city: Set(payload.city),
        state: Set(payload.state),
        postal_code: Set(payload.postal_code),
        country: Set(payload.country),
        notes: Set(payload.notes),
        is_active: Set(payload.is_active.unwrap_or(true)),
        ..Default::default()
    };

    let repo = ClientRepository::new((*state.db).clone());
    match repo.create(org_id, model).await {
        Ok(client) => {
            info!(client_id = %client.id, organization_id = %org_id, "client created");
            (StatusCode::CREATED, Json(json!(client))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create client");
            internal_error().into_response()
        }
    }
}

/// GET /clients/{id} - Client detail with balance summary.
async fn detail(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let repo = ClientRepository::new((*state.db).clone());
    let client = match repo.find(org_id, id).await {
        Ok(Some(client)) => client,
        Ok(None) => return not_found().into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load client");
            return internal_error().into_response();
        }
    };

    let dashboard = DashboardRepository::new((*state.db).clone());
    let figures = match dashboard.invoice_figures_for_client(org_id, id).await {
        Ok(figures) => figures,
        Err(e) => {
            error!(error = %e, "Failed to load client invoices");
            return internal_error().into_response();
        }
    };

    let balances = client_balances(&figures, Utc::now().date_naive());
    let mut value = json!(client);
    value["balances"] = json!(balances);
    Json(value).into_response()
}

/// PATCH /clients/{id} - Partial update.
async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let model = clients::ActiveModel {
        display_name: payload.display_name.map_or(NotSet, Set),
        company: payload.company.map_or(NotSet, |v| Set(Some(v))),
        email: payload.email.map_or(NotSet, |v| Set(Some(v))),
        phone: payload.phone.map_or(NotSet, |v| Set(Some(v))),
        business_phone: payload.business_phone.map_or(NotSet, |v| Set(Some(v))),
        mobile_phone: payload.mobile_phone.map_or(NotSet, |v| Set(Some(v))),
        address_line1: payload.address_line1.map_or(NotSet, |v| Set(Some(v))),
        address_line2: payload.address_line2.map_or(NotSet, |v| Set(Some(v))),
        city: payload.city.map_or(NotSet, |v| Set(Some(v))),
        state: payload.state.map_or(NotSet, |v| Set(Some(v))),
        postal_code: payload.postal_code.map_or(NotSet, |v| Set(Some(v))),
        country: payload.country.map_or(NotSet, |v| Set(Some(v))),
        notes: payload.notes.map_or(NotSet, |v| Set(Some(v))),
        is_active: payload.is_active.map_or(NotSet, Set),
        ..Default::default()
    };

    let repo = ClientRepository::new((*state.db).clone());
    match repo.update(org_id, id, model).await {
        Ok(Some(client)) => Json(json!(client)).into_response(),
        Ok(None) => not_found().into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update client");
            internal_error().into_response()
        }
    }
}

/// POST /clients/bulk - Archive or delete a set of clients.
async fn bulk(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Json(payload): Json<BulkRequest>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    if payload.ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "ids must not be empty"
            })),
        )
            .into_response();
    }

    let repo = ClientRepository::new((*state.db).clone());
    let result = match payload.action.as_str() {
        "archive" => repo.bulk_archive(org_id, &payload.ids).await,
        "delete" => repo.bulk_delete(org_id, &payload.ids).await,
        other => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "validation_error",
                    "message": format!("Unknown bulk action: {other}")
                })),
            )
                .into_response();
        }
    };

    match result {
        Ok(affected) => {
            info!(organization_id = %org_id, action = %payload.action, affected, "bulk client action");
            Json(json!({ "affected": affected })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Bulk client action failed");
            internal_error().into_response()
        }
    }
}

/// GET /clients/export - CSV download of every client in the organization.
async fn export(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let repo = ClientRepository::new((*state.db).clone());
    let rows = match repo.all_for_export(org_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to export clients");
            return internal_error().into_response();
        }
    };

    let fields: Vec<ClientCsvFields> = rows.into_iter().map(to_csv_fields).collect();
    let csv = export_clients(&fields);
    let filename = format!("clients-export-{}.csv", Utc::now().date_naive());

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=\"utf-8\"".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response()
}

/// POST /clients/import - Multipart CSV upload (field name: file).
async fn import(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let mut csv_text: Option<String> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    match field.text().await {
                        Ok(text) => csv_text = Some(text),
                        Err(e) => {
                            error!(error = %e, "Failed to read uploaded CSV");
                            return internal_error().into_response();
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Malformed multipart upload");
                return internal_error().into_response();
            }
        }
    }

    let Some(text) = csv_text else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "CSV file is required (field name: file)"
            })),
        )
            .into_response();
    };

    let rows = import_clients(&text);
    if rows.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "No valid rows found to import"
            })),
        )
            .into_response();
    }

    let repo = ClientRepository::new((*state.db).clone());
    match repo.import(org_id, rows).await {
        Ok(imported) => {
            info!(organization_id = %org_id, imported, "clients imported");
            Json(json!({ "imported": imported })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Client import failed");
            internal_error().into_response()
        }
    }
}

fn to_csv_fields(client: clients::Model) -> ClientCsvFields {
    ClientCsvFields {
        display_name: client.display_name,
        company: client.company.unwrap_or_default(),
        email: client.email.unwrap_or_default(),
        phone: client.phone.unwrap_or_default(),
        address_line1: client.address_line1.unwrap_or_default(),
        address_line2: client.address_line2.unwrap_or_default(),
        city: client.city.unwrap_or_default(),
        state: client.state.unwrap_or_default(),
        country: client.country.unwrap_or_default(),
        postal_code: client.postal_code.unwrap_or_default(),
        notes: client.notes.unwrap_or_default(),
    }
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not_found", "message": "Client not found" })),
    )
}
