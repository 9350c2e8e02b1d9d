//! Dashboard route.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::middleware::{AuthUser, OrgCookie};
use crate::tenant::{active_org, internal_error};
use faktura_core::aggregation::{outstanding_revenue, profit_and_loss, summary_counts};
use faktura_core::period::ReportingPeriod;
use faktura_db::{DashboardRepository, OrganizationRepository};

/// Creates the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    #[serde(default)]
    period: Option<String>,
}

/// GET /dashboard?period=... - Aggregate metrics for the active
/// organization. Unknown period strings fall back to the last 30 days.
async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let today = Utc::now().date_naive();
    let period = ReportingPeriod::parse(query.period.as_deref().unwrap_or_default());
    let window = period.resolve(today);

    let org_repo = OrganizationRepository::new((*state.db).clone());
    let currency = match org_repo.find_by_id(org_id).await {
        Ok(Some(org)) => org.base_currency,
        Ok(None) => {
            error!(organization_id = %org_id, "active organization row missing");
            return internal_error().into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to load organization");
            return internal_error().into_response();
        }
    };

    let repo = DashboardRepository::new((*state.db).clone());
    let invoices = match repo.invoice_figures(org_id).await {
        Ok(figures) => figures,
        Err(e) => {
            error!(error = %e, "Failed to load invoice figures");
            return internal_error().into_response();
        }
    };
    let expenses = match repo.expense_figures(org_id, window).await {
        Ok(figures) => figures,
        Err(e) => {
            error!(error = %e, "Failed to load expense figures");
            return internal_error().into_response();
        }
    };

    let revenue = outstanding_revenue(&invoices, today, &currency);
    let profit = profit_and_loss(&invoices, &expenses, window, &currency);
    let counts = summary_counts(&invoices, today);

    let mut profit_value = json!(profit);
    profit_value["monthlySeries"] = json!([]);

    Json(json!({
        "period": period.as_str(),
        "metrics": {
            "outstandingRevenue": revenue,
            "profit": profit_value,
        },
        "summaryCounts": counts,
        "recentActivity": [],
    }))
    .into_response()
}
