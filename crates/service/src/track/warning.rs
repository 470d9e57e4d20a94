use chrono::{Local, NaiveDateTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::errors::require_text;
use models::warning::{self, validate_period, validate_start_in_future};
use models::section_warning;

use crate::errors::ServiceError;
use crate::pagination::{fetch, Pagination};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWarning {
    pub warning_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "common::datetime")]
    pub start_date: NaiveDateTime,
    #[serde(default, deserialize_with = "common::datetime::option::deserialize")]
    pub end_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWarning {
    pub warning_name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "common::datetime::option::deserialize")]
    pub start_date: Option<NaiveDateTime>,
    /// `null` removes the end date.
    #[serde(default, deserialize_with = "common::datetime::patch::deserialize")]
    pub end_date: Option<Option<NaiveDateTime>>,
}

/// Warnings are entered in local wall-clock time.
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Not yet ended at `now`.
pub(crate) fn active_at(now: NaiveDateTime) -> Condition {
    Condition::any()
        .add(warning::Column::EndDate.is_null())
        .add(warning::Column::EndDate.gte(now))
}

async fn name_taken(db: &DatabaseConnection, name: &str, except_id: Option<i32>) -> Result<bool, ServiceError> {
    let mut q = warning::Entity::find().filter(warning::Column::WarningName.eq(name));
    if let Some(id) = except_id {
        q = q.filter(warning::Column::Id.ne(id));
    }
    Ok(q.count(db).await? > 0)
}

#[instrument(skip(db, input), fields(name = %input.warning_name))]
pub async fn create_warning(db: &DatabaseConnection, input: CreateWarning) -> Result<warning::Model, ServiceError> {
    let warning_name = require_text("warningName", &input.warning_name)?;
    validate_start_in_future(input.start_date, local_now())?;
    validate_period(input.start_date, input.end_date)?;
    if name_taken(db, &warning_name, None).await? {
        return Err(ServiceError::conflict("Warning with this name already exists"));
    }
    let created = warning::ActiveModel {
        warning_name: Set(warning_name),
        description: Set(input.description.trim().to_string()),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(warning_id = created.id, "warning_created");
    Ok(created)
}

/// Expired warnings read as absent.
pub async fn get_warning(db: &DatabaseConnection, id: i32) -> Result<Option<warning::Model>, ServiceError> {
    let found = warning::Entity::find_by_id(id).one(db).await?;
    Ok(found.filter(|w| !w.is_expired(local_now())))
}

pub async fn list_warnings(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<warning::Model>, ServiceError> {
    let select = warning::Entity::find()
        .filter(active_at(local_now()))
        .order_by_asc(warning::Column::StartDate)
        .order_by_asc(warning::Column::Id);
    Ok(fetch(select, db, page).await?)
}

#[instrument(skip(db, input))]
pub async fn update_warning(db: &DatabaseConnection, id: i32, input: UpdateWarning) -> Result<warning::Model, ServiceError> {
    let current = warning::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Warning"))?;

    let start = input.start_date.unwrap_or(current.start_date);
    let end = input.end_date.unwrap_or(current.end_date);
    if let Some(s) = input.start_date {
        validate_start_in_future(s, local_now())?;
    }
    validate_period(start, end)?;

    let mut am: warning::ActiveModel = current.into();
    if let Some(n) = &input.warning_name {
        let n = require_text("warningName", n)?;
        if name_taken(db, &n, Some(id)).await? {
            return Err(ServiceError::conflict("Warning with this name already exists"));
        }
        am.warning_name = Set(n);
    }
    if let Some(d) = &input.description { am.description = Set(d.trim().to_string()); }
    am.start_date = Set(start);
    am.end_date = Set(end);
    let updated = am.update(db).await?;
    info!(warning_id = id, "warning_updated");
    Ok(updated)
}

/// Also detaches the warning from every section.
#[instrument(skip(db))]
pub async fn delete_warning(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    if warning::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Warning"));
    }
    section_warning::Entity::delete_many()
        .filter(section_warning::Column::WarningId.eq(id))
        .exec(&txn)
        .await?;
    warning::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(warning_id = id, "warning_deleted");
    Ok(())
}
