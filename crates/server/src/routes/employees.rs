use axum::{extract::State, http::StatusCode, Json};
use models::employee;
use service::fleet::employee as svc;
use service::pagination::PageQuery;

use super::auth::{AdminUser, CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::metrics::record_event;

pub async fn list_employees(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<employee::Model>>, ApiError> {
    Ok(Json(svc::list_employees(&state.db, q.pagination()).await?))
}

pub async fn get_employee(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<employee::Model>, ApiError> {
    svc::get_employee_by_username(&state.db, &username)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Employee"))
}

pub async fn create_employee(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<svc::CreateEmployee>,
) -> Result<(StatusCode, Json<employee::Model>), ApiError> {
    let created = svc::create_employee(&state.db, input).await?;
    record_event("employee_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_employee(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(ssn): ApiPath<String>,
    ApiJson(input): ApiJson<svc::UpdateEmployee>,
) -> Result<Json<employee::Model>, ApiError> {
    let updated = svc::update_employee(&state.db, &ssn, input).await?;
    record_event("employee_updated");
    Ok(Json(updated))
}

pub async fn delete_employee(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(ssn): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    svc::delete_employee(&state.db, &ssn).await?;
    record_event("employee_deleted");
    Ok(StatusCode::NO_CONTENT)
}
