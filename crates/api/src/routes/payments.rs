//! Payment routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::{AuthUser, OrgCookie};
use crate::tenant::{active_org, internal_error};
use faktura_db::{PaymentRepository, repositories::NewPayment};
use faktura_shared::types::{PageRequest, PageResponse};

/// Creates the payment router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments", get(list).post(create))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentPayload {
    invoice_id: Option<Uuid>,
    amount: Option<Decimal>,
    payment_date: Option<NaiveDate>,
    method: Option<String>,
    notes: Option<String>,
}

/// GET /payments - Paginated payment list with their invoices.
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

    let repo = PaymentRepository::new((*state.db).clone());
    let (rows, total) = match repo.list(org_id, query.q.as_deref(), &page).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Failed to list payments");
            return internal_error().into_response();
        }
    };

    let items: Vec<_> = rows
        .into_iter()
        .map(|(payment, invoice)| {
            let mut value = json!(payment);
            value["invoice"] = json!(invoice);
            value
        })
        .collect();

    Json(PageResponse::new(items, &page, total)).into_response()
}

/// POST /payments - Record a payment against an invoice.
async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Json(payload): Json<PaymentPayload>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let Some(invoice_id) = payload.invoice_id else {
        return validation_error("invoiceId is required").into_response();
    };
    let Some(amount) = payload.amount.filter(|a| *a > Decimal::ZERO) else {
        return validation_error("A positive amount is required").into_response();
    };

    let payment = NewPayment {
        invoice_id,
        amount,
        payment_date: payload.payment_date.unwrap_or_else(|| Utc::now().date_naive()),
        method: payload.method,
        notes: payload.notes,
    };

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.record_payment(org_id, payment).await {
        Ok(Some((payment, invoice))) => {
            info!(payment_id = %payment.id, invoice_id = %invoice.id, "payment created");
            let mut value = json!(payment);
            value["invoice"] = json!(invoice);
            (StatusCode::CREATED, Json(value)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not_found", "message": "Invoice not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to record payment");
            internal_error().into_response()
        }
    }
}

fn validation_error(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "validation_error", "message": message })),
    )
}
