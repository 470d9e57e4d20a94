use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, BootstrapAdmin};
use serde_json::{json, Value};
use tower::ServiceExt;

use server::startup::build_app;

const ADMIN_PASSWORD: &str = "changeme123";

fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".into();
    cfg.auth.bootstrap_admin = Some(BootstrapAdmin {
        ssn: "1234010180".into(),
        first_name: "Ada".into(),
        last_name: "Admin".into(),
        username: None,
        password: ADMIN_PASSWORD.into(),
    });
    cfg
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn login(app: &Router, username: &str, password: &str) -> anyhow::Result<String> {
    let (status, body) = call(app, Method::POST, "/employees/login", None, Some(json!({"username": username, "password": password}))).await?;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

async fn post_id(app: &Router, token: &str, uri: &str, body: Value) -> anyhow::Result<i64> {
    let (status, created) = call(app, Method::POST, uri, Some(token), Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED, "POST {uri}: {created}");
    Ok(created["id"].as_i64().unwrap_or_default())
}

#[tokio::test]
async fn health_is_public_and_api_requires_session() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app(&test_config()).await?;

    let (status, body) = call(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, Method::GET, "/fleet/carriages", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = call(&app, Method::GET, "/fleet/carriages", Some("not-a-session"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_validates_and_sets_cookie() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app(&test_config()).await?;

    let (status, _) = call(&app, Method::POST, "/employees/login", None, Some(json!({"username": "ada.admin"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::POST, "/employees/login", None, Some(json!({"username": "ada.admin", "password": "wrong-pass"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect username or password");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/employees/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"username": "ada.admin", "password": ADMIN_PASSWORD}))?))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("auth_token="));
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await?)?;
    assert_eq!(body["role"], "Admin");
    assert_eq!(body["department"], "Crew");

    // the cookie alone is enough to authenticate
    let pair = cookie.split(';').next().unwrap_or_default().to_string();
    let req = Request::builder().uri("/employees").header(header::COOKIE, pair).body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // logout ends the session
    let token = body["token"].as_str().unwrap_or_default().to_string();
    let (status, _) = call(&app, Method::POST, "/employees/logout", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, "/employees", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn employees_can_read_but_not_write() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app(&test_config()).await?;
    let admin = login(&app, "ada.admin", ADMIN_PASSWORD).await?;

    let (status, created) = call(&app, Method::POST, "/employees", Some(&admin), Some(json!({
        "ssn": "5678020290", "firstName": "Max", "lastName": "Mustermann",
        "password": "Passw0rd!", "department": "Crew"
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["username"], "max.mustermann");
    assert_eq!(created["role"], "Employee");
    assert!(created.get("passwordHash").is_none());

    let employee = login(&app, "max.mustermann", "Passw0rd!").await?;
    let (status, _) = call(&app, Method::GET, "/fleet/carriages", Some(&employee), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::POST, "/fleet/carriages", Some(&employee), Some(json!({
        "trackGauge": 1435, "type": "Railcar", "maxTractiveForce": 100
    }))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");

    let (status, _) = call(&app, Method::GET, "/employees/max.mustermann", Some(&employee), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, "/employees/nobody", Some(&employee), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn train_composition_and_carriage_guards() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app(&test_config()).await?;
    let admin = login(&app, "ada.admin", ADMIN_PASSWORD).await?;

    let railcar = post_id(&app, &admin, "/fleet/carriages", json!({"trackGauge": 1435, "type": "Railcar", "maxTractiveForce": 100})).await?;
    let light = post_id(&app, &admin, "/fleet/carriages", json!({"trackGauge": 1435, "type": "PassengerCar", "numberOfSeats": 40, "maxWeight": 60})).await?;
    let heavy = post_id(&app, &admin, "/fleet/carriages", json!({"trackGauge": 1435, "type": "PassengerCar", "numberOfSeats": 40, "maxWeight": 60})).await?;

    let (status, body) = call(&app, Method::POST, "/fleet/trains", Some(&admin), Some(json!({
        "name": "IC 1", "railcarId": railcar, "passengerCarIds": [light, heavy]
    }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Railcar too weak");

    let train = post_id(&app, &admin, "/fleet/trains", json!({"name": "IC 1", "railcarId": railcar, "passengerCarIds": [light]})).await?;
    let (status, body) = call(&app, Method::GET, &format!("/fleet/trains/{train}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["passengerCarIds"], json!([light]));

    let (status, body) = call(&app, Method::DELETE, &format!("/fleet/carriages/{railcar}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Cannot delete"));

    let (status, _) = call(&app, Method::DELETE, &format!("/fleet/carriages/{heavy}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::GET, &format!("/fleet/carriages/{heavy}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn overlapping_maintenance_is_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app(&test_config()).await?;
    let admin = login(&app, "ada.admin", ADMIN_PASSWORD).await?;

    let (status, _) = call(&app, Method::POST, "/employees", Some(&admin), Some(json!({
        "ssn": "4321030385", "firstName": "Erik", "lastName": "Schrauber",
        "password": "Passw0rd!", "department": "Maintenance"
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);

    let railcar = post_id(&app, &admin, "/fleet/carriages", json!({"trackGauge": 1000, "type": "Railcar", "maxTractiveForce": 500})).await?;
    let car = post_id(&app, &admin, "/fleet/carriages", json!({"trackGauge": 1000, "type": "PassengerCar", "numberOfSeats": 30, "maxWeight": 50})).await?;
    let train = post_id(&app, &admin, "/fleet/trains", json!({"name": "R 7", "railcarId": railcar, "passengerCarIds": [car]})).await?;

    post_id(&app, &admin, "/fleet/maintenances", json!({
        "employeeSsn": "4321030385", "trainId": train,
        "fromTime": "2025-03-01T08:00:00", "toTime": "2025-03-01T12:00:00"
    })).await?;
    let (status, body) = call(&app, Method::POST, "/fleet/maintenances", Some(&admin), Some(json!({
        "employeeSsn": "4321030385", "trainId": train,
        "fromTime": "2025-03-01 11:00", "toTime": "2025-03-01 13:00"
    }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Employee already assigned to overlapping maintenance time");

    let (status, body) = call(&app, Method::DELETE, &format!("/fleet/trains/{train}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cannot delete train with existing maintenance");
    Ok(())
}

#[tokio::test]
async fn malformed_body_and_unknown_route() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app(&test_config()).await?;
    let admin = login(&app, "ada.admin", ADMIN_PASSWORD).await?;

    let (status, body) = call(&app, Method::POST, "/fleet/carriages", Some(&admin), Some(json!({"trackGauge": "wide", "type": "Railcar"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = call(&app, Method::GET, "/nowhere", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");

    let resp = app.clone().oneshot(Request::builder().uri("/metrics").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await?.to_vec())?;
    assert!(text.contains("railway_http_rejections_total"));
    Ok(())
}

#[tokio::test]
async fn rides_are_expanded_and_double_booking_is_refused() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app(&test_config()).await?;
    let admin = login(&app, "ada.admin", ADMIN_PASSWORD).await?;

    let linz = post_id(&app, &admin, "/track/train-stations", json!({"stationName": "Linz Hauptbahnhof", "address": "Bahnhofplatz 3, 4020 Linz"})).await?;
    let wels = post_id(&app, &admin, "/track/train-stations", json!({"stationName": "Wels Hauptbahnhof", "address": "Bahnhofplatz 1, 4600 Wels"})).await?;
    let section = post_id(&app, &admin, "/track/sections", json!({
        "usageFee": 12.5, "length": 25.0, "maxSpeed": 160, "trackGauge": 1435,
        "startStationId": linz, "endStationId": wels
    })).await?;
    let track = post_id(&app, &admin, "/track/tracks", json!({"trackName": "Westbahn", "sectionIds": [section]})).await?;
    let plan = post_id(&app, &admin, "/stopplans", json!({"name": "Linz-Wels", "trackId": track, "trainStationIds": [linz, wels]})).await?;

    let railcar = post_id(&app, &admin, "/fleet/carriages", json!({"trackGauge": 1435, "type": "Railcar", "maxTractiveForce": 200})).await?;
    let car = post_id(&app, &admin, "/fleet/carriages", json!({"trackGauge": 1435, "type": "PassengerCar", "numberOfSeats": 50, "maxWeight": 80})).await?;
    let train = post_id(&app, &admin, "/fleet/trains", json!({"name": "REX 1", "railcarId": railcar, "passengerCarIds": [car]})).await?;

    let pattern = json!({"startDate": "2025-06-02", "startTime": "08:00", "endTime": "09:00", "intervalMinutes": 30});
    let mut body = pattern.clone();
    body["stopplanId"] = json!(plan);
    body["trainId"] = json!(train);
    body["employeeSsns"] = json!(["1234010180"]);

    let (status, rides) = call(&app, Method::POST, "/ride_executions", Some(&admin), Some(body.clone())).await?;
    assert_eq!(status, StatusCode::CREATED, "{rides}");
    assert_eq!(rides.as_array().map(Vec::len), Some(3));

    let (status, _) = call(&app, Method::POST, "/ride_executions", Some(&admin), Some(body)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, free) = call(&app, Method::POST, "/available_trains", Some(&admin), Some(pattern)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(free, json!([]));

    let (status, body) = call(&app, Method::DELETE, &format!("/stopplans/{plan}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cannot delete stopplan with existing ride executions");

    let (status, body) = call(&app, Method::GET, &format!("/track/tracks/{track}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sections"][0]["usageFee"], json!(12.5));
    Ok(())
}

#[tokio::test]
async fn demoted_or_deleted_employees_lose_access() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app(&test_config()).await?;
    let admin = login(&app, "ada.admin", ADMIN_PASSWORD).await?;

    let (status, _) = call(&app, Method::POST, "/employees", Some(&admin), Some(json!({
        "ssn": "2468050575", "firstName": "Bob", "lastName": "Boss", "username": "bob.boss",
        "password": "Passw0rd!", "department": "Crew", "role": "Admin"
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let bob = login(&app, "bob.boss", "Passw0rd!").await?;
    let railcar = json!({"trackGauge": 1435, "type": "Railcar", "maxTractiveForce": 100});
    let (status, _) = call(&app, Method::POST, "/fleet/carriages", Some(&bob), Some(railcar.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(&app, Method::PUT, "/employees/2468050575", Some(&admin), Some(json!({"role": "Employee"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::POST, "/fleet/carriages", Some(&bob), Some(railcar.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, Method::GET, "/fleet/carriages", Some(&bob), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::DELETE, "/employees/2468050575", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::GET, "/fleet/carriages", Some(&bob), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
