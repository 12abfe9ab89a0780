//! Company HTTP handlers

use crate::core::error::ApiError;
use crate::core::extractors::JsonBody;
use crate::core::model::Company;
use crate::core::service::CompanyService;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Company-specific AppState
#[derive(Clone)]
pub struct CompanyAppState {
    pub service: Arc<dyn CompanyService>,
}

/// GET /companies → `{companies: [{code, name}, ...]}`
pub async fn list_companies(State(state): State<CompanyAppState>) -> Result<Json<Value>, ApiError> {
    let companies = state.service.list_companies().await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /companies/{code} → `{company: {code, name, description}}`
pub async fn get_company(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let company = state
        .service
        .get_company(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("company", &code))?;

    Ok(Json(json!({ "company": company })))
}

/// POST /companies with `{code, name, description}` → 201 `{company: {...}}`
pub async fn create_company(
    State(state): State<CompanyAppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let company = Company::new(
        body.required_str("code")?,
        body.required_str("name")?,
        body.required_str("description")?,
    );

    let company = state.service.create_company(company).await?;
    tracing::info!(code = %company.code, "company created");

    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// PUT /companies/{code} with `{name, description}` → `{company: {...}}`
pub async fn update_company(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>, ApiError> {
    let name = body.required_str("name")?;
    let description = body.required_str("description")?;

    let company = state
        .service
        .update_company(&code, name, description)
        .await?
        .ok_or_else(|| ApiError::not_found("company", &code))?;
    tracing::info!(code = %company.code, "company updated");

    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/{code} → `{status: "deleted"}`
pub async fn delete_company(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.service.delete_company(&code).await? {
        return Err(ApiError::not_found("company", &code));
    }
    tracing::info!(code = %code, "company deleted");

    Ok(Json(json!({ "status": "deleted" })))
}
