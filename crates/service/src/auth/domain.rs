use models::enums::{Department, Role};
use serde::{Deserialize, Serialize};

/// Login input. Fields are optional so a missing one is a validation error, not a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The employee behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub ssn: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: Department,
}

/// Stored login material for one employee.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: SessionUser,
    pub password_hash: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: SessionUser,
}
