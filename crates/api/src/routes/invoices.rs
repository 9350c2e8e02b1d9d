//! Invoice routes: CRUD, attachments, PDF download, and email delivery.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::{AuthUser, OrgCookie};
use crate::tenant::{active_org, internal_error};
use faktura_core::invoice::{InvoiceStatus, amount_due, effective_status};
use faktura_core::pdf::{InvoicePdf, PdfLineItem, render_invoice};
use faktura_db::{
    AttachmentRepository, ClientRepository, InvoiceRepository, OrganizationRepository,
    entities::{invoices, sea_orm_active_enums::AttachmentVisibility},
    repositories::NewLineItem,
};
use faktura_shared::types::{PageRequest, PageResponse};

/// Creates the invoice router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list).post(create))
        .route("/invoices/{id}", get(detail).patch(update).delete(remove))
        .route(
            "/invoices/{id}/attachments",
            get(attachments).post(create_attachment),
        )
        .route("/attachments/{id}", get(attachment_detail))
        .route("/generate-invoice-pdf", get(generate_pdf))
        .route("/send-invoice-email", post(send_email))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemPayload {
    description: String,
    #[serde(default)]
    quantity: Decimal,
    #[serde(default)]
    unit_price: Decimal,
    #[serde(default)]
    line_total: Decimal,
}

/// Create/update payload. Totals are persisted as submitted; nothing is
/// recomputed from the line items.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoicePayload {
    client_id: Option<Uuid>,
    number: Option<String>,
    status: Option<String>,
    issue_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    currency: Option<String>,
    subtotal: Option<Decimal>,
    tax: Option<Decimal>,
    discount: Option<Decimal>,
    total: Option<Decimal>,
    reference: Option<String>,
    notes: Option<String>,
    terms: Option<String>,
    line_items: Option<Vec<LineItemPayload>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentPayload {
    file_name: Option<String>,
    file_path: Option<String>,
    file_size: Option<i64>,
    file_type: Option<String>,
    visibility: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PdfQuery {
    invoice_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest {
    invoice_id: Uuid,
    to_email: Option<String>,
    subject: Option<String>,
    #[serde(default = "default_true")]
    mark_as_sent: bool,
}

const fn default_true() -> bool {
    true
}

/// GET /invoices - Paginated list with client rows and effective statuses.
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

    let repo = InvoiceRepository::new((*state.db).clone());
    let (rows, total) = match repo.list(org_id, query.q.as_deref(), &page).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Failed to list invoices");
            return internal_error().into_response();
        }
    };

    let today = Utc::now().date_naive();
    let items: Vec<_> = rows
        .into_iter()
        .map(|(invoice, client)| {
            let status = effective_status(invoice.status.clone().into(), invoice.due_date, today);
            let due = amount_due(invoice.total, invoice.amount_paid);
            let mut value = json!(invoice);
            value["effectiveStatus"] = json!(status);
            value["amountDue"] = json!(due);
            value["client"] = json!(client);
            value
        })
        .collect();

    Json(PageResponse::new(items, &page, total)).into_response()
}

/// POST /invoices - Create an invoice with its line items.
async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Json(payload): Json<InvoicePayload>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let Some(client_id) = payload.client_id else {
        return validation_error("clientId is required").into_response();
    };
    let number = payload.number.as_deref().map(str::trim).unwrap_or_default();
    if number.is_empty() {
        return validation_error("An invoice number is required").into_response();
    }
    let line_items = payload.line_items.unwrap_or_default();
    if line_items.is_empty() {
        return validation_error("At least one line item is required").into_response();
    }

    let status = match parse_status(payload.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response.into_response(),
    };

    let client_repo = ClientRepository::new((*state.db).clone());
    match client_repo.find(org_id, client_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return validation_error("Unknown client").into_response(),
        Err(e) => {
            error!(error = %e, "Failed to verify client");
            return internal_error().into_response();
        }
    }

    let currency = match payload.currency {
        Some(currency) => currency,
        None => match org_currency(&state, org_id).await {
            Ok(currency) => currency,
            Err(response) => return response.into_response(),
        },
    };

    let model = invoices::ActiveModel {
        client_id: Set(client_id),
        number: Set(number.to_string()),
        status: Set(status.into()),
        issue_date: Set(payload.issue_date),
        due_date: Set(payload.due_date),
        currency: Set(currency),
        subtotal: Set(payload.subtotal.unwrap_or_default()),
        tax: Set(payload.tax.unwrap_or_default()),
        discount: Set(payload.discount.unwrap_or_default()),
        total: Set(payload.total.unwrap_or_default()),
        amount_paid: Set(Decimal::ZERO),
        paid_at: Set(None),
        reference: Set(payload.reference),
        notes: Set(payload.notes),
        terms: Set(payload.terms),
        ..Default::default()
    };

    let items = line_items.into_iter().map(to_new_item).collect();
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.create_with_items(org_id, model, items).await {
        Ok(invoice) => {
            info!(invoice_id = %invoice.id, number = %invoice.number, "invoice created");
            (StatusCode::CREATED, Json(json!(invoice))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create invoice");
            internal_error().into_response()
        }
    }
}

/// GET /invoices/{id} - Detail with client, line items, and derived fields.
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

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.find_with_details(org_id, id).await {
        Ok(Some((invoice, client, items))) => {
            let today = Utc::now().date_naive();
            let status = effective_status(invoice.status.clone().into(), invoice.due_date, today);
            let due = amount_due(invoice.total, invoice.amount_paid);
            let mut value = json!(invoice);
            value["effectiveStatus"] = json!(status);
            value["amountDue"] = json!(due);
            value["client"] = json!(client);
            value["lineItems"] = json!(items);
            Json(value).into_response()
        }
        Ok(None) => not_found().into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load invoice");
            internal_error().into_response()
        }
    }
}

/// PATCH /invoices/{id} - Partial update; a line-item set replaces the old one.
async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Path(id): Path<Uuid>,
    Json(payload): Json<InvoicePayload>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let status = match payload.status.as_deref() {
        Some(raw) => match parse_status(Some(raw)) {
            Ok(status) => Set(status.into()),
            Err(response) => return response.into_response(),
        },
        None => NotSet,
    };

    let model = invoices::ActiveModel {
        client_id: payload.client_id.map_or(NotSet, Set),
        number: payload
            .number
            .map_or(NotSet, |n| Set(n.trim().to_string())),
        status,
        issue_date: payload.issue_date.map_or(NotSet, |v| Set(Some(v))),
        due_date: payload.due_date.map_or(NotSet, |v| Set(Some(v))),
        currency: payload.currency.map_or(NotSet, Set),
        subtotal: payload.subtotal.map_or(NotSet, Set),
        tax: payload.tax.map_or(NotSet, Set),
        discount: payload.discount.map_or(NotSet, Set),
        total: payload.total.map_or(NotSet, Set),
        reference: payload.reference.map_or(NotSet, |v| Set(Some(v))),
        notes: payload.notes.map_or(NotSet, |v| Set(Some(v))),
        terms: payload.terms.map_or(NotSet, |v| Set(Some(v))),
        ..Default::default()
    };

    let items = payload
        .line_items
        .map(|items| items.into_iter().map(to_new_item).collect());

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.update_with_items(org_id, id, model, items).await {
        Ok(Some(invoice)) => Json(json!(invoice)).into_response(),
        Ok(None) => not_found().into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update invoice");
            internal_error().into_response()
        }
    }
}

/// DELETE /invoices/{id} - Remove the invoice and its line items. Recorded
/// payments are kept.
async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.delete(org_id, id).await {
        Ok(true) => {
            info!(invoice_id = %id, "invoice deleted");
            Json(json!({ "success": true })).into_response()
        }
        Ok(false) => not_found().into_response(),
        Err(e) => {
            error!(error = %e, "Failed to delete invoice");
            internal_error().into_response()
        }
    }
}

/// GET /invoices/{id}/attachments - Attachments visible today.
async fn attachments(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let repo = AttachmentRepository::new((*state.db).clone());
    match repo.list_visible(org_id, id, Utc::now().date_naive()).await {
        Ok(Some(attachments)) => Json(json!({ "attachments": attachments })).into_response(),
        Ok(None) => not_found().into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list attachments");
            internal_error().into_response()
        }
    }
}

/// POST /invoices/{id}/attachments - Record attachment metadata. The file
/// itself lives in external storage; only its descriptor is kept here.
async fn create_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttachmentPayload>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let file_name = payload.file_name.as_deref().map(str::trim).unwrap_or_default();
    if file_name.is_empty() {
        return validation_error("A file name is required").into_response();
    }
    let file_path = payload.file_path.as_deref().map(str::trim).unwrap_or_default();
    if file_path.is_empty() {
        return validation_error("A file path is required").into_response();
    }
    let visibility = match parse_visibility(payload.visibility.as_deref()) {
        Ok(visibility) => visibility,
        Err(response) => return response.into_response(),
    };

    let repo = AttachmentRepository::new((*state.db).clone());
    match repo
        .create(
            org_id,
            id,
            file_name.to_string(),
            file_path.to_string(),
            payload.file_size.unwrap_or(0),
            payload
                .file_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            visibility,
        )
        .await
    {
        Ok(Some(attachment)) => {
            info!(attachment_id = %attachment.id, invoice_id = %id, "attachment recorded");
            (StatusCode::CREATED, Json(json!(attachment))).into_response()
        }
        Ok(None) => not_found().into_response(),
        Err(e) => {
            error!(error = %e, "Failed to record attachment");
            internal_error().into_response()
        }
    }
}

/// GET /attachments/{id} - Single attachment descriptor. Locked attachments
/// on unpaid invoices are denied as not found.
async fn attachment_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let repo = AttachmentRepository::new((*state.db).clone());
    match repo.find_visible(org_id, id, Utc::now().date_naive()).await {
        Ok(Some(attachment)) => Json(json!(attachment)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not_found", "message": "Attachment not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load attachment");
            internal_error().into_response()
        }
    }
}

/// GET /generate-invoice-pdf?invoiceId=... - Render the invoice as a PDF
/// download.
async fn generate_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Query(query): Query<PdfQuery>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let Some((invoice, client, items)) =
        (match repo.find_with_details(org_id, query.invoice_id).await {
            Ok(found) => found,
            Err(e) => {
                error!(error = %e, "Failed to load invoice for PDF");
                return internal_error().into_response();
            }
        })
    else {
        return not_found().into_response();
    };

    let organization_name = match org_name(&state, org_id).await {
        Ok(name) => name,
        Err(response) => return response.into_response(),
    };

    let document = InvoicePdf {
        number: invoice.number.clone(),
        organization_name,
        client_name: client
            .as_ref()
            .map_or_else(|| "Client".to_string(), |c| c.display_name.clone()),
        client_company: client.as_ref().and_then(|c| c.company.clone()),
        client_email: client.as_ref().and_then(|c| c.email.clone()),
        issue_date: invoice.issue_date,
        due_date: invoice.due_date,
        currency: invoice.currency.clone(),
        line_items: items
            .into_iter()
            .map(|item| PdfLineItem {
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total,
            })
            .collect(),
        subtotal: invoice.subtotal,
        tax: invoice.tax,
        discount: invoice.discount,
        total: invoice.total,
        amount_paid: invoice.amount_paid,
        notes: invoice.notes.clone(),
    };

    match render_invoice(&document) {
        Ok(bytes) => {
            let filename = format!("invoice-{}.pdf", invoice.number);
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, invoice_id = %invoice.id, "PDF rendering failed");
            internal_error().into_response()
        }
    }
}

/// POST /send-invoice-email - Email the invoice to the client and, by
/// default, flip DRAFT to SENT.
async fn send_email(
    State(state): State<AppState>,
    auth: AuthUser,
    org_cookie: OrgCookie,
    Json(payload): Json<SendEmailRequest>,
) -> impl IntoResponse {
    let (_, org_id) = match active_org(&state, &auth, org_cookie).await {
        Ok(resolved) => resolved,
        Err(response) => return response.into_response(),
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let Some((invoice, client, _)) =
        (match repo.find_with_details(org_id, payload.invoice_id).await {
            Ok(found) => found,
            Err(e) => {
                error!(error = %e, "Failed to load invoice for email");
                return internal_error().into_response();
            }
        })
    else {
        return not_found().into_response();
    };

    let to = payload
        .to_email
        .filter(|e| !e.trim().is_empty())
        .or_else(|| client.as_ref().and_then(|c| c.email.clone()));
    let Some(to) = to else {
        return validation_error("No recipient email: pass toEmail or set one on the client")
            .into_response();
    };

    let organization_name = match org_name(&state, org_id).await {
        Ok(name) => name,
        Err(response) => return response.into_response(),
    };

    let subject = payload
        .subject
        .unwrap_or_else(|| format!("Invoice {} from {}", invoice.number, organization_name));
    let body = format!(
        "Hello,\n\nInvoice {} for {} {} is ready.\n\nThank you,\n{}",
        invoice.number, invoice.total, invoice.currency, organization_name
    );

    if let Err(e) = state.email_service.send(&to, &subject, &body).await {
        error!(error = %e, invoice_id = %invoice.id, "Failed to send invoice email");
        return internal_error().into_response();
    }

    let final_invoice = if payload.mark_as_sent {
        match repo.mark_sent(org_id, invoice.id).await {
            Ok(Some(updated)) => updated,
            Ok(None) => invoice,
            Err(e) => {
                error!(error = %e, "Failed to mark invoice as sent");
                return internal_error().into_response();
            }
        }
    } else {
        invoice
    };

    info!(invoice_id = %final_invoice.id, to = %to, "invoice emailed");
    Json(json!({ "sent": true, "invoice": final_invoice })).into_response()
}

async fn org_name(
    state: &AppState,
    org_id: Uuid,
) -> Result<String, (StatusCode, Json<serde_json::Value>)> {
    let repo = OrganizationRepository::new((*state.db).clone());
    match repo.find_by_id(org_id).await {
        Ok(Some(org)) => Ok(org.name),
        Ok(None) => {
            error!(organization_id = %org_id, "active organization row missing");
            Err(internal_error())
        }
        Err(e) => {
            error!(error = %e, "Failed to load organization");
            Err(internal_error())
        }
    }
}

async fn org_currency(
    state: &AppState,
    org_id: Uuid,
) -> Result<String, (StatusCode, Json<serde_json::Value>)> {
    let repo = OrganizationRepository::new((*state.db).clone());
    match repo.find_by_id(org_id).await {
        Ok(Some(org)) => Ok(org.base_currency),
        Ok(None) => {
            error!(organization_id = %org_id, "active organization row missing");
            Err(internal_error())
        }
        Err(e) => {
            error!(error = %e, "Failed to load organization");
            Err(internal_error())
        }
    }
}

fn parse_status(
    raw: Option<&str>,
) -> Result<InvoiceStatus, (StatusCode, Json<serde_json::Value>)> {
    match raw {
        None => Ok(InvoiceStatus::Draft),
        Some(raw) => InvoiceStatus::parse(raw).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "validation_error",
                    "message": format!("Unknown invoice status: {raw}")
                })),
            )
        }),
    }
}

fn parse_visibility(
    raw: Option<&str>,
) -> Result<AttachmentVisibility, (StatusCode, Json<serde_json::Value>)> {
    match raw {
        None | Some("always_viewable") => Ok(AttachmentVisibility::AlwaysViewable),
        Some("locked_until_paid") => Ok(AttachmentVisibility::LockedUntilPaid),
        Some(raw) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": format!("Unknown attachment visibility: {raw}")
            })),
        )),
    }
}

fn to_new_item(item: LineItemPayload) -> NewLineItem {
    NewLineItem {
        description: item.description,
        quantity: item.quantity,
        unit_price: item.unit_price,
        line_total: item.line_total,
    }
}

fn validation_error(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "validation_error", "message": message })),
    )
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not_found", "message": "Invoice not found" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, InvoiceStatus::Draft)]
    #[case(Some("SENT"), InvoiceStatus::Sent)]
    #[case(Some("PAID"), InvoiceStatus::Paid)]
    #[case(Some("VOID"), InvoiceStatus::Void)]
    fn test_parse_status(#[case] raw: Option<&str>, #[case] expected: InvoiceStatus) {
        assert_eq!(parse_status(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("sent")]
    #[case("CANCELLED")]
    fn test_parse_status_rejects_unknown(#[case] raw: &str) {
        assert!(parse_status(Some(raw)).is_err());
    }

    #[rstest]
    #[case(None, AttachmentVisibility::AlwaysViewable)]
    #[case(Some("always_viewable"), AttachmentVisibility::AlwaysViewable)]
    #[case(Some("locked_until_paid"), AttachmentVisibility::LockedUntilPaid)]
    fn test_parse_visibility(#[case] raw: Option<&str>, #[case] expected: AttachmentVisibility) {
        assert_eq!(parse_visibility(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("LOCKED_UNTIL_PAID")]
    #[case("public")]
    fn test_parse_visibility_rejects_unknown(#[case] raw: &str) {
        assert!(parse_visibility(Some(raw)).is_err());
    }
}
