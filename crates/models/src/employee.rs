use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::{Department, Role};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ssn: String,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub department: Department,
    pub role: Role,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

// four serial digits followed by the birth date as DDMMYY
static SSN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}(0[1-9]|[12][0-9]|3[01])(0[1-9]|1[0-2])\d{2}$").expect("valid ssn regex")
});

pub fn validate_ssn(ssn: &str) -> Result<String, ModelError> {
    let ssn = ssn.trim();
    if !SSN_RE.is_match(ssn) {
        return Err(ModelError::validation("Invalid SSN format"));
    }
    Ok(ssn.to_string())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.chars().count() < 8 {
        return Err(ModelError::validation("password too short (>=8)"));
    }
    Ok(())
}

/// `firstname.lastname`, lower-cased with inner whitespace removed.
pub fn default_username(first_name: &str, last_name: &str) -> String {
    let squash = |s: &str| s.split_whitespace().collect::<String>().to_lowercase();
    format!("{}.{}", squash(first_name), squash(last_name))
}

pub fn validate_username(username: &str) -> Result<String, ModelError> {
    let username = username.trim();
    if username.is_empty() || username.chars().any(char::is_whitespace) {
        return Err(ModelError::validation("username must be non-empty without whitespace"));
    }
    Ok(username.to_string())
}
