use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::types::MessageBody;
use models::enums::{Department, Role};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use service::auth::domain::{AuthSession, LoginInput, SessionUser};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::AuthService;

use crate::errors::ApiError;
use crate::extract::ApiJson;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub message: String,
    pub token: String,
    pub username: String,
    pub role: Role,
    pub department: Department,
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    let user = session.user;
    let out = LoginOutput {
        message: "Login successful".into(),
        token: session.token,
        username: user.username,
        role: user.role,
        department: user.department,
    };
    Ok((jar, Json(out)))
}

pub async fn logout(
    State(state): State<ServerState>,
    Extension(session): Extension<AuthSession>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageBody>) {
    state.auth.logout(&session.token).await;
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), Json(MessageBody::new("Logout successful")))
}

/// Token from `Authorization` (with or without `Bearer `), else the `auth_token` cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(AUTH_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Resolve the caller's session. Protected routes see it as an `AuthSession` extension.
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let token = session_token(req.headers()).ok_or_else(ApiError::unauthorized)?;
    let user = state.auth.authenticate(&token).await?;
    req.extensions_mut().insert(AuthSession { token, user });
    Ok(next.run(req).await)
}

/// Any logged-in employee.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<AuthSession>().ok_or_else(ApiError::unauthorized)?;
        AuthService::<SeaOrmAuthRepository>::require_role(&session.user, Role::Employee)?;
        Ok(CurrentUser(session.user.clone()))
    }
}

/// Callers with the Admin role; everyone else gets 403.
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<AuthSession>().ok_or_else(ApiError::unauthorized)?;
        AuthService::<SeaOrmAuthRepository>::require_role(&session.user, Role::Admin)?;
        Ok(AdminUser(session.user.clone()))
    }
}
