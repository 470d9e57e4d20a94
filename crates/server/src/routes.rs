use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;
use crate::metrics;

pub mod auth;
pub mod employees;
pub mod fleet;
pub mod schedule;
pub mod track;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics_text() -> impl IntoResponse {
    metrics::encode_metrics()
}

async fn fallback() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

/// Build the application router: public health/metrics/login plus the session-protected API.
pub fn build_router(state: auth::ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .route("/employees/login", post(auth::login));

    let protected = Router::new()
        .route("/employees/logout", post(auth::logout))
        .route("/employees", get(employees::list_employees).post(employees::create_employee))
        .route(
            "/employees/:key",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        // fleet
        .route("/fleet/carriages", get(fleet::list_carriages).post(fleet::create_carriage))
        .route(
            "/fleet/carriages/:id",
            get(fleet::get_carriage).put(fleet::update_carriage).delete(fleet::delete_carriage),
        )
        .route("/fleet/trains", get(fleet::list_trains).post(fleet::create_train))
        .route(
            "/fleet/trains/:id",
            get(fleet::get_train).put(fleet::update_train).delete(fleet::delete_train),
        )
        .route("/fleet/maintenances", get(fleet::list_maintenances).post(fleet::create_maintenance))
        .route(
            "/fleet/maintenances/:id",
            get(fleet::get_maintenance).put(fleet::update_maintenance).delete(fleet::delete_maintenance),
        )
        // track
        .route("/track/train-stations", get(track::list_stations).post(track::create_station))
        .route(
            "/track/train-stations/:id",
            get(track::get_station).put(track::update_station).delete(track::delete_station),
        )
        .route("/track/sections", get(track::list_sections).post(track::create_section))
        .route(
            "/track/sections/:id",
            get(track::get_section).put(track::update_section).delete(track::delete_section),
        )
        .route("/track/warnings", get(track::list_warnings).post(track::create_warning))
        .route(
            "/track/warnings/:id",
            get(track::get_warning).put(track::update_warning).delete(track::delete_warning),
        )
        .route("/track/tracks", get(track::list_tracks).post(track::create_track))
        .route(
            "/track/tracks/:id",
            get(track::get_track).put(track::update_track).delete(track::delete_track),
        )
        // schedule
        .route("/stopplans", get(schedule::list_stopplans).post(schedule::create_stopplan))
        .route(
            "/stopplans/:id",
            get(schedule::get_stopplan).put(schedule::update_stopplan).delete(schedule::delete_stopplan),
        )
        .route(
            "/ride_executions",
            get(schedule::list_ride_executions).post(schedule::create_ride_executions),
        )
        .route(
            "/ride_executions/:id",
            get(schedule::get_ride_execution)
                .put(schedule::update_ride_execution)
                .delete(schedule::delete_ride_execution),
        )
        .route("/available_trains", post(schedule::available_trains))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    public
        .merge(protected)
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
