use configs::BootstrapAdmin;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::employee::{self, default_username, validate_password, validate_ssn, validate_username};
use models::enums::{Department, Role};
use models::errors::require_text;

use crate::auth::password::hash_password;
use crate::errors::ServiceError;
use crate::guards;
use crate::pagination::{fetch, Pagination};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    pub ssn: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to `firstname.lastname`, suffixed with a number when taken.
    pub username: Option<String>,
    pub password: String,
    pub department: Department,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub department: Option<Department>,
    pub role: Option<Role>,
}

async fn username_taken<C: ConnectionTrait>(db: &C, username: &str, except_ssn: Option<&str>) -> Result<bool, ServiceError> {
    let mut q = employee::Entity::find().filter(employee::Column::Username.eq(username));
    if let Some(ssn) = except_ssn {
        q = q.filter(employee::Column::Ssn.ne(ssn));
    }
    Ok(q.count(db).await? > 0)
}

/// `base`, then `base2`, `base3`, ... until one is free.
async fn free_username<C: ConnectionTrait>(db: &C, base: &str) -> Result<String, ServiceError> {
    if !username_taken(db, base, None).await? {
        return Ok(base.to_string());
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{base}{n}");
        if !username_taken(db, &candidate, None).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}

#[instrument(skip(db, input), fields(ssn = %input.ssn, department = ?input.department))]
pub async fn create_employee(db: &DatabaseConnection, input: CreateEmployee) -> Result<employee::Model, ServiceError> {
    let ssn = validate_ssn(&input.ssn)?;
    let first_name = require_text("firstName", &input.first_name)?;
    let last_name = require_text("lastName", &input.last_name)?;
    validate_password(&input.password)?;

    if employee::Entity::find_by_id(ssn.clone()).one(db).await?.is_some() {
        return Err(ServiceError::conflict("Employee with this SSN already exists"));
    }
    let username = match input.username.as_deref() {
        Some(u) => {
            let u = validate_username(u)?;
            if username_taken(db, &u, None).await? {
                return Err(ServiceError::conflict("Username already taken"));
            }
            u
        }
        None => free_username(db, &default_username(&first_name, &last_name)).await?,
    };

    let created = employee::ActiveModel {
        ssn: Set(ssn),
        first_name: Set(first_name),
        last_name: Set(last_name),
        username: Set(username),
        password_hash: Set(hash_password(&input.password)?),
        department: Set(input.department),
        role: Set(input.role.unwrap_or(Role::Employee)),
    }
    .insert(db)
    .await?;
    info!(ssn = %created.ssn, username = %created.username, "employee_created");
    Ok(created)
}

pub async fn get_employee(db: &DatabaseConnection, ssn: &str) -> Result<Option<employee::Model>, ServiceError> {
    Ok(employee::Entity::find_by_id(ssn.to_string()).one(db).await?)
}

pub async fn get_employee_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<employee::Model>, ServiceError> {
    Ok(employee::Entity::find()
        .filter(employee::Column::Username.eq(username))
        .one(db)
        .await?)
}

pub async fn list_employees(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<employee::Model>, ServiceError> {
    let select = employee::Entity::find()
        .order_by_asc(employee::Column::LastName)
        .order_by_asc(employee::Column::FirstName);
    Ok(fetch(select, db, page).await?)
}

#[instrument(skip(db, input))]
pub async fn update_employee(db: &DatabaseConnection, ssn: &str, input: UpdateEmployee) -> Result<employee::Model, ServiceError> {
    let current = employee::Entity::find_by_id(ssn.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Employee"))?;

    let leaves_maintenance = matches!(input.department, Some(d) if d != Department::Maintenance)
        && current.department == Department::Maintenance;
    if leaves_maintenance && guards::employee_has_maintenance(db, ssn).await? {
        return Err(ServiceError::conflict("Cannot change department of employee with existing maintenance"));
    }

    let mut am: employee::ActiveModel = current.into();
    if let Some(f) = &input.first_name { am.first_name = Set(require_text("firstName", f)?); }
    if let Some(l) = &input.last_name { am.last_name = Set(require_text("lastName", l)?); }
    if let Some(u) = &input.username {
        let u = validate_username(u)?;
        if username_taken(db, &u, Some(ssn)).await? {
            return Err(ServiceError::conflict("Username already taken"));
        }
        am.username = Set(u);
    }
    if let Some(p) = &input.password {
        validate_password(p)?;
        am.password_hash = Set(hash_password(p)?);
    }
    if let Some(d) = input.department { am.department = Set(d); }
    if let Some(r) = input.role { am.role = Set(r); }
    let updated = am.update(db).await?;
    info!(ssn, "employee_updated");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete_employee(db: &DatabaseConnection, ssn: &str) -> Result<(), ServiceError> {
    if employee::Entity::find_by_id(ssn.to_string()).one(db).await?.is_none() {
        return Err(ServiceError::not_found("Employee"));
    }
    if guards::employee_has_assignments(db, ssn).await? {
        return Err(ServiceError::conflict("Cannot delete employee with existing assignments"));
    }
    employee::Entity::delete_by_id(ssn.to_string()).exec(db).await?;
    info!(ssn, "employee_deleted");
    Ok(())
}

/// Create the configured admin account when no employee exists yet.
pub async fn ensure_bootstrap_admin(db: &DatabaseConnection, admin: &BootstrapAdmin) -> Result<Option<employee::Model>, ServiceError> {
    if employee::Entity::find().count(db).await? > 0 {
        return Ok(None);
    }
    let created = create_employee(
        db,
        CreateEmployee {
            ssn: admin.ssn.clone(),
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            username: admin.username.clone(),
            password: admin.password.clone(),
            department: Department::Crew,
            role: Some(Role::Admin),
        },
    )
    .await?;
    info!(username = %created.username, "bootstrap_admin_created");
    Ok(Some(created))
}
