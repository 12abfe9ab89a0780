//! Invoice HTTP handlers

use crate::core::error::ApiError;
use crate::core::extractors::{JsonBody, parse_invoice_id};
use crate::core::service::InvoiceService;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Invoice-specific AppState
#[derive(Clone)]
pub struct InvoiceAppState {
    pub service: Arc<dyn InvoiceService>,
}

/// GET /invoices → `{invoices: [{id, comp_code}, ...]}`
pub async fn list_invoices(State(state): State<InvoiceAppState>) -> Result<Json<Value>, ApiError> {
    let invoices = state.service.list_invoices().await?;
    Ok(Json(json!({ "invoices": invoices })))
}

/// GET /invoices/{id} → `{invoice: {id, amt, paid, add_date, paid_date, company}}`
pub async fn get_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_invoice_id(&id)?;

    let invoice = state
        .service
        .get_invoice_with_company(id)
        .await?
        .ok_or_else(|| ApiError::not_found("invoice", id))?;

    Ok(Json(json!({ "invoice": invoice })))
}

/// POST /invoices with `{comp_code, amt}` → 201 `{invoice: {...}}`
pub async fn create_invoice(
    State(state): State<InvoiceAppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let comp_code = body.required_str("comp_code")?;
    let amt = body.required_f64("amt")?;

    let invoice = state.service.create_invoice(comp_code, amt).await?;
    tracing::info!(id = invoice.id, comp_code = %invoice.comp_code, "invoice created");

    Ok((StatusCode::CREATED, Json(json!({ "invoice": invoice }))))
}

/// PUT /invoices/{id} with `{amt, paid}` → `{invoice: {...}}`
///
/// `paid_date` is stamped when the invoice becomes paid and cleared when it
/// becomes unpaid.
pub async fn update_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>, ApiError> {
    let id = parse_invoice_id(&id)?;
    let amt = body.required_f64("amt")?;
    let paid = body.required_bool("paid")?;

    let invoice = state
        .service
        .update_invoice(id, amt, paid)
        .await?
        .ok_or_else(|| ApiError::not_found("invoice", id))?;
    tracing::info!(id = invoice.id, paid = invoice.paid, "invoice updated");

    Ok(Json(json!({ "invoice": invoice })))
}

/// DELETE /invoices/{id} → `{status: "deleted"}`
pub async fn delete_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_invoice_id(&id)?;

    if !state.service.delete_invoice(id).await? {
        return Err(ApiError::not_found("invoice", id));
    }
    tracing::info!(id, "invoice deleted");

    Ok(Json(json!({ "status": "deleted" })))
}

/// GET /companies/{code}/invoices → `{invoices: [{id, amt, paid, add_date, paid_date}, ...]}`
pub async fn list_company_invoices(
    State(state): State<InvoiceAppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let invoices = state
        .service
        .list_company_invoices(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("company", &code))?;

    Ok(Json(json!({ "invoices": invoices })))
}
