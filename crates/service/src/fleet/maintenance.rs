use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::enums::Department;
use models::{employee, maintenance, train};

use crate::errors::ServiceError;
use crate::pagination::{fetch, Pagination};
use crate::validation::{find_overlap, validate_window, Window};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenance {
    pub employee_ssn: String,
    pub train_id: i32,
    #[serde(with = "common::datetime")]
    pub from_time: NaiveDateTime,
    #[serde(with = "common::datetime")]
    pub to_time: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenance {
    pub employee_ssn: Option<String>,
    pub train_id: Option<i32>,
    #[serde(default, deserialize_with = "common::datetime::option::deserialize")]
    pub from_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "common::datetime::option::deserialize")]
    pub to_time: Option<NaiveDateTime>,
}

async fn require_maintenance_employee<C: ConnectionTrait>(db: &C, ssn: &str) -> Result<(), ServiceError> {
    let e = employee::Entity::find_by_id(ssn.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Employee"))?;
    if e.department != Department::Maintenance {
        return Err(ServiceError::validation("Only Maintenance department employees can perform maintenances"));
    }
    Ok(())
}

async fn require_train<C: ConnectionTrait>(db: &C, train_id: i32) -> Result<(), ServiceError> {
    if train::Entity::find_by_id(train_id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("Train"));
    }
    Ok(())
}

/// Reject `window` if it collides with another window of the same employee.
async fn check_schedule<C: ConnectionTrait>(db: &C, ssn: &str, window: &Window, exclude_id: Option<i32>) -> Result<(), ServiceError> {
    // only rows that could overlap are loaded; the validator makes the final call
    let candidates = maintenance::Entity::find()
        .filter(maintenance::Column::EmployeeSsn.eq(ssn))
        .filter(maintenance::Column::FromTime.lt(window.to))
        .filter(maintenance::Column::ToTime.gt(window.from))
        .all(db)
        .await?;
    let existing = candidates
        .into_iter()
        .map(|m| (m.id, Window { from: m.from_time, to: m.to_time }));
    find_overlap(window, existing, exclude_id)?;
    Ok(())
}

#[instrument(skip(db, input), fields(employee = %input.employee_ssn, train_id = input.train_id))]
pub async fn create_maintenance(db: &DatabaseConnection, input: CreateMaintenance) -> Result<maintenance::Model, ServiceError> {
    let window = validate_window(input.from_time, input.to_time)?;
    let ssn = input.employee_ssn.trim().to_string();

    let txn = db.begin().await?;
    require_maintenance_employee(&txn, &ssn).await?;
    require_train(&txn, input.train_id).await?;
    check_schedule(&txn, &ssn, &window, None).await?;
    let created = maintenance::ActiveModel {
        employee_ssn: Set(ssn),
        train_id: Set(input.train_id),
        from_time: Set(window.from),
        to_time: Set(window.to),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(maintenance_id = created.id, "maintenance_created");
    Ok(created)
}

pub async fn get_maintenance(db: &DatabaseConnection, id: i32) -> Result<Option<maintenance::Model>, ServiceError> {
    Ok(maintenance::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_maintenances(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<maintenance::Model>, ServiceError> {
    let select = maintenance::Entity::find()
        .order_by_asc(maintenance::Column::FromTime)
        .order_by_asc(maintenance::Column::Id);
    Ok(fetch(select, db, page).await?)
}

#[instrument(skip(db, input))]
pub async fn update_maintenance(db: &DatabaseConnection, id: i32, input: UpdateMaintenance) -> Result<maintenance::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = maintenance::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Maintenance"))?;

    let ssn = input.employee_ssn.as_deref().map(str::trim).unwrap_or(current.employee_ssn.as_str()).to_string();
    let train_id = input.train_id.unwrap_or(current.train_id);
    let window = validate_window(
        input.from_time.unwrap_or(current.from_time),
        input.to_time.unwrap_or(current.to_time),
    )?;

    if ssn != current.employee_ssn {
        require_maintenance_employee(&txn, &ssn).await?;
    }
    if train_id != current.train_id {
        require_train(&txn, train_id).await?;
    }
    check_schedule(&txn, &ssn, &window, Some(id)).await?;

    let mut am: maintenance::ActiveModel = current.into();
    am.employee_ssn = Set(ssn);
    am.train_id = Set(train_id);
    am.from_time = Set(window.from);
    am.to_time = Set(window.to);
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!(maintenance_id = id, "maintenance_updated");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete_maintenance(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = maintenance::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("Maintenance"));
    }
    info!(maintenance_id = id, "maintenance_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::train::{create_train, CreateTrain};
    use crate::test_support::{at, employee, get_db, passenger_car, railcar};
    use models::enums::TrackGauge;

    async fn setup(db: &DatabaseConnection) -> anyhow::Result<i32> {
        let r = railcar(db, TrackGauge::Standard, 100).await?;
        let p = passenger_car(db, TrackGauge::Standard, 10).await?;
        let t = create_train(db, CreateTrain { name: "T".into(), railcar_id: r.id, passenger_car_ids: vec![p.id] }).await?;
        employee(db, "1111010190", Department::Maintenance).await?;
        employee(db, "2222010190", Department::Crew).await?;
        Ok(t.id)
    }

    fn input(ssn: &str, train_id: i32, from: u32, to: u32) -> CreateMaintenance {
        CreateMaintenance {
            employee_ssn: ssn.into(),
            train_id,
            from_time: at(2025, 3, 3, from, 0),
            to_time: at(2025, 3, 3, to, 0),
        }
    }

    #[tokio::test]
    async fn overlapping_window_is_rejected() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let train_id = setup(&db).await?;

        create_maintenance(&db, input("1111010190", train_id, 11, 13)).await?;
        let err = create_maintenance(&db, input("1111010190", train_id, 10, 12)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Employee already assigned to overlapping maintenance time"));

        // back to back is fine
        create_maintenance(&db, input("1111010190", train_id, 13, 14)).await?;
        assert_eq!(list_maintenances(&db, None).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn only_maintenance_staff_and_forward_windows() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let train_id = setup(&db).await?;

        let err = create_maintenance(&db, input("2222010190", train_id, 8, 9)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.starts_with("Only Maintenance")));
        let err = create_maintenance(&db, input("1111010190", train_id, 9, 9)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = create_maintenance(&db, input("1111010190", 999, 8, 9)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn update_ignores_its_own_window() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let train_id = setup(&db).await?;
        let m = create_maintenance(&db, input("1111010190", train_id, 8, 10)).await?;
        let other = create_maintenance(&db, input("1111010190", train_id, 12, 14)).await?;

        let moved = update_maintenance(
            &db,
            m.id,
            UpdateMaintenance { to_time: Some(at(2025, 3, 3, 11, 0)), ..Default::default() },
        )
        .await?;
        assert_eq!(moved.to_time, at(2025, 3, 3, 11, 0));

        let err = update_maintenance(
            &db,
            other.id,
            UpdateMaintenance { from_time: Some(at(2025, 3, 3, 10, 30)), ..Default::default() },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        delete_maintenance(&db, m.id).await?;
        assert!(matches!(delete_maintenance(&db, m.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
