use axum::{extract::State, http::StatusCode, Json};
use service::fleet::train::TrainView;
use service::schedule::pattern::SchedulePattern;
use service::schedule::ride_execution::RideExecutionView;
use service::schedule::stopplan::StopplanView;
use service::schedule::{ride_execution, stopplan};
use service::pagination::PageQuery;

use super::auth::{AdminUser, CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::metrics::{record_event, DOMAIN_EVENTS_TOTAL};

pub async fn list_stopplans(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<StopplanView>>, ApiError> {
    Ok(Json(stopplan::list_stopplans(&state.db, q.pagination()).await?))
}

pub async fn get_stopplan(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<StopplanView>, ApiError> {
    stopplan::get_stopplan(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Stopplan"))
}

pub async fn create_stopplan(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<stopplan::CreateStopplan>,
) -> Result<(StatusCode, Json<StopplanView>), ApiError> {
    let created = stopplan::create_stopplan(&state.db, input).await?;
    record_event("stopplan_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_stopplan(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<stopplan::UpdateStopplan>,
) -> Result<Json<StopplanView>, ApiError> {
    let updated = stopplan::update_stopplan(&state.db, id, input).await?;
    record_event("stopplan_updated");
    Ok(Json(updated))
}

pub async fn delete_stopplan(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    stopplan::delete_stopplan(&state.db, id).await?;
    record_event("stopplan_deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_ride_executions(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<RideExecutionView>>, ApiError> {
    Ok(Json(ride_execution::list_ride_executions(&state.db, q.pagination()).await?))
}

pub async fn get_ride_execution(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<RideExecutionView>, ApiError> {
    ride_execution::get_ride_execution(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Ride execution"))
}

/// Expands the pattern into one ride per slot and returns all of them.
pub async fn create_ride_executions(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<ride_execution::CreateRideExecutions>,
) -> Result<(StatusCode, Json<Vec<RideExecutionView>>), ApiError> {
    let created = ride_execution::create_ride_executions(&state.db, input).await?;
    DOMAIN_EVENTS_TOTAL.with_label_values(&["ride_execution_created"]).inc_by(created.len() as u64);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_ride_execution(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<ride_execution::UpdateRideExecution>,
) -> Result<Json<RideExecutionView>, ApiError> {
    let updated = ride_execution::update_ride_execution(&state.db, id, input).await?;
    record_event("ride_execution_updated");
    Ok(Json(updated))
}

pub async fn delete_ride_execution(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    ride_execution::delete_ride_execution(&state.db, id).await?;
    record_event("ride_execution_deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Trains with no ride at any slot of the posted pattern.
pub async fn available_trains(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiJson(pattern): ApiJson<SchedulePattern>,
) -> Result<Json<Vec<TrainView>>, ApiError> {
    Ok(Json(ride_execution::available_trains(&state.db, &pattern).await?))
}
