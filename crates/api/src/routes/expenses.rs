//! Expense routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::{AuthUser, OrgCookie};
use crate::tenant::{active_org, internal_error};
use faktura_db::{ExpenseRepository, OrganizationRepository, entities::expenses};
use faktura_shared::types::{PageRequest, PageResponse};

/// Creates the expense router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/expenses", get(list).post(create))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    recurring: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpensePayload {
    merchant: Option<String>,
    category: Option<String>,
    amount: Option<Decimal>,
    tax_amount: Option<Decimal>,
    currency: Option<String>,
    expense_date: Option<NaiveDate>,
    description: Option<String>,
    client_id: Option<Uuid>,
    #[serde(default)]
    is_recurring: bool,
    #[serde(default)]
    billable: bool,
}

/// GET /expenses - Paginated expense list.
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

    let repo = ExpenseRepository::new((*state.db).clone());
    match repo
        .list(org_id, query.q.as_deref(), query.recurring, &page)
        .await
    {
        Ok((items, total)) => Json(PageResponse::new(items, &page, total)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list expenses");
            internal_error().into_response()
        }
    }
}

/// POST /expenses - Create an expense. Currency falls back to the
/// organization's base currency.
async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Json(payload): Json<ExpensePayload>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let merchant = payload.merchant.as_deref().map(str::trim).unwrap_or_default();
    if merchant.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "A merchant is required"
            })),
        )
            .into_response();
    }
    let Some(amount) = payload.amount else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "An amount is required"
            })),
        )
            .into_response();
    };

    let currency = match payload.currency {
        Some(currency) => currency,
        None => {
            let org_repo = OrganizationRepository::new((*state.db).clone());
            match org_repo.find_by_id(org_id).await {
                Ok(Some(org)) => org.base_currency,
                Ok(None) => {
                    error!(organization_id = %org_id, "active organization row missing");
                    return internal_error().into_response();
                }
                Err(e) => {
                    error!(error = %e, "Failed to load organization");
                    return internal_error().into_response();
                }
            }
        }
    };

    let model = expenses::ActiveModel {
        client_id: Set(payload.client_id),
        merchant: Set(merchant.to_string()),
        category: Set(payload.category),
        amount: Set(amount),
        tax_amount: Set(payload.tax_amount.unwrap_or_default()),
        currency: Set(currency),
        expense_date: Set(payload.expense_date.unwrap_or_else(|| Utc::now().date_naive())),
        description: Set(payload.description),
        is_recurring: Set(payload.is_recurring),
        billable: Set(payload.billable),
        billed: Set(false),
        ..Default::default()
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.create(org_id, model).await {
        Ok(expense) => {
            info!(expense_id = %expense.id, merchant = %expense.merchant, "expense created");
            (StatusCode::CREATED, Json(json!(expense))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create expense");
            internal_error().into_response()
        }
    }
}
