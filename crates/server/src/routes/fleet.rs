//! `/fleet` handlers: carriages, trains and maintenances.

use axum::{extract::State, http::StatusCode, Json};
use service::fleet::train::TrainView;
use service::fleet::{carriage, maintenance, train};
use service::pagination::PageQuery;

use super::auth::{AdminUser, CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::metrics::record_event;

pub async fn list_carriages(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<models::carriage::Model>>, ApiError> {
    Ok(Json(carriage::list_carriages(&state.db, q.pagination()).await?))
}

pub async fn get_carriage(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<models::carriage::Model>, ApiError> {
    carriage::get_carriage(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Carriage"))
}

pub async fn create_carriage(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<carriage::CreateCarriage>,
) -> Result<(StatusCode, Json<models::carriage::Model>), ApiError> {
    let created = carriage::create_carriage(&state.db, input).await?;
    record_event("carriage_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_carriage(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<carriage::UpdateCarriage>,
) -> Result<Json<models::carriage::Model>, ApiError> {
    let updated = carriage::update_carriage(&state.db, id, input).await?;
    record_event("carriage_updated");
    Ok(Json(updated))
}

pub async fn delete_carriage(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    carriage::delete_carriage(&state.db, id).await?;
    record_event("carriage_deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_trains(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<TrainView>>, ApiError> {
    Ok(Json(train::list_trains(&state.db, q.pagination()).await?))
}

pub async fn get_train(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<TrainView>, ApiError> {
    train::get_train(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Train"))
}

pub async fn create_train(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<train::CreateTrain>,
) -> Result<(StatusCode, Json<TrainView>), ApiError> {
    let created = train::create_train(&state.db, input).await?;
    record_event("train_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_train(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<train::UpdateTrain>,
) -> Result<Json<TrainView>, ApiError> {
    let updated = train::update_train(&state.db, id, input).await?;
    record_event("train_updated");
    Ok(Json(updated))
}

pub async fn delete_train(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    train::delete_train(&state.db, id).await?;
    record_event("train_deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_maintenances(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<models::maintenance::Model>>, ApiError> {
    Ok(Json(maintenance::list_maintenances(&state.db, q.pagination()).await?))
}

pub async fn get_maintenance(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<models::maintenance::Model>, ApiError> {
    maintenance::get_maintenance(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Maintenance"))
}

pub async fn create_maintenance(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<maintenance::CreateMaintenance>,
) -> Result<(StatusCode, Json<models::maintenance::Model>), ApiError> {
    let created = maintenance::create_maintenance(&state.db, input).await?;
    record_event("maintenance_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_maintenance(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<maintenance::UpdateMaintenance>,
) -> Result<Json<models::maintenance::Model>, ApiError> {
    let updated = maintenance::update_maintenance(&state.db, id, input).await?;
    record_event("maintenance_updated");
    Ok(Json(updated))
}

pub async fn delete_maintenance(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    maintenance::delete_maintenance(&state.db, id).await?;
    record_event("maintenance_deleted");
    Ok(StatusCode::NO_CONTENT)
}
