use axum::{extract::State, http::StatusCode, Json};
use service::track::section::SectionView;
use service::track::track::TrackView;
use service::track::{section, station, track, warning};
use service::pagination::PageQuery;

use super::auth::{AdminUser, CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::metrics::record_event;

pub async fn list_stations(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<models::train_station::Model>>, ApiError> {
    Ok(Json(station::list_stations(&state.db, q.pagination()).await?))
}

pub async fn get_station(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<models::train_station::Model>, ApiError> {
    station::get_station(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Train station"))
}

pub async fn create_station(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<station::CreateStation>,
) -> Result<(StatusCode, Json<models::train_station::Model>), ApiError> {
    let created = station::create_station(&state.db, input).await?;
    record_event("station_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_station(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<station::UpdateStation>,
) -> Result<Json<models::train_station::Model>, ApiError> {
    let updated = station::update_station(&state.db, id, input).await?;
    record_event("station_updated");
    Ok(Json(updated))
}

pub async fn delete_station(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    station::delete_station(&state.db, id).await?;
    record_event("station_deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_sections(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<SectionView>>, ApiError> {
    Ok(Json(section::list_sections(&state.db, q.pagination()).await?))
}

pub async fn get_section(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<SectionView>, ApiError> {
    section::get_section(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Section"))
}

pub async fn create_section(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<section::CreateSection>,
) -> Result<(StatusCode, Json<SectionView>), ApiError> {
    let created = section::create_section(&state.db, input).await?;
    record_event("section_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_section(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<section::UpdateSection>,
) -> Result<Json<SectionView>, ApiError> {
    let updated = section::update_section(&state.db, id, input).await?;
    record_event("section_updated");
    Ok(Json(updated))
}

pub async fn delete_section(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    section::delete_section(&state.db, id).await?;
    record_event("section_deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_warnings(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<models::warning::Model>>, ApiError> {
    Ok(Json(warning::list_warnings(&state.db, q.pagination()).await?))
}

pub async fn get_warning(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<models::warning::Model>, ApiError> {
    warning::get_warning(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Warning"))
}

pub async fn create_warning(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<warning::CreateWarning>,
) -> Result<(StatusCode, Json<models::warning::Model>), ApiError> {
    let created = warning::create_warning(&state.db, input).await?;
    record_event("warning_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_warning(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<warning::UpdateWarning>,
) -> Result<Json<models::warning::Model>, ApiError> {
    let updated = warning::update_warning(&state.db, id, input).await?;
    record_event("warning_updated");
    Ok(Json(updated))
}

pub async fn delete_warning(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    warning::delete_warning(&state.db, id).await?;
    record_event("warning_deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tracks(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<TrackView>>, ApiError> {
    Ok(Json(track::list_tracks(&state.db, q.pagination()).await?))
}

pub async fn get_track(
    State(state): State<ServerState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<TrackView>, ApiError> {
    track::get_track(&state.db, id).await?.map(Json).ok_or_else(|| ApiError::not_found("Track"))
}

pub async fn create_track(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<track::CreateTrack>,
) -> Result<(StatusCode, Json<TrackView>), ApiError> {
    let created = track::create_track(&state.db, input).await?;
    record_event("track_created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_track(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<track::UpdateTrack>,
) -> Result<Json<TrackView>, ApiError> {
    let updated = track::update_track(&state.db, id, input).await?;
    record_event("track_updated");
    Ok(Json(updated))
}

pub async fn delete_track(
    State(state): State<ServerState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    track::delete_track(&state.db, id).await?;
    record_event("track_deleted");
    Ok(StatusCode::NO_CONTENT)
}
