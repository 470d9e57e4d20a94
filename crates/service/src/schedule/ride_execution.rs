use std::collections::{BTreeSet, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::{employee, ride_execution, ride_execution_employee, stopplan, train};

use super::pattern::{SchedulePattern, Slot};
use crate::errors::ServiceError;
use crate::fleet::train::{list_trains, TrainView};
use crate::pagination::{fetch, Pagination};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideExecutions {
    #[serde(flatten)]
    pub pattern: SchedulePattern,
    pub stopplan_id: i32,
    pub train_id: i32,
    pub employee_ssns: Vec<String>,
    /// Defaults to the stop plan's `minPrice`.
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRideExecution {
    pub is_canceled: Option<bool>,
    /// Minutes.
    pub delay: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideExecutionView {
    #[serde(flatten)]
    pub ride: ride_execution::Model,
    pub employee_ssns: Vec<String>,
}

async fn crew<C: ConnectionTrait>(db: &C, ride_id: i32) -> Result<Vec<String>, ServiceError> {
    let rows = ride_execution_employee::Entity::find()
        .filter(ride_execution_employee::Column::RideExecutionId.eq(ride_id))
        .order_by_asc(ride_execution_employee::Column::EmployeeSsn)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.employee_ssn).collect())
}

async fn view<C: ConnectionTrait>(db: &C, ride: ride_execution::Model) -> Result<RideExecutionView, ServiceError> {
    let employee_ssns = crew(db, ride.id).await?;
    Ok(RideExecutionView { ride, employee_ssns })
}

/// Non-canceled rides at any of `slots`, optionally for one train only.
async fn booked_at<C: ConnectionTrait>(db: &C, slots: &[Slot], train_id: Option<i32>) -> Result<Vec<ride_execution::Model>, ServiceError> {
    let dates: BTreeSet<_> = slots.iter().map(|s| s.date).collect();
    let mut q = ride_execution::Entity::find()
        .filter(ride_execution::Column::IsCanceled.eq(false))
        .filter(ride_execution::Column::Date.is_in(dates));
    if let Some(t) = train_id {
        q = q.filter(ride_execution::Column::TrainId.eq(t));
    }
    let wanted: HashSet<&Slot> = slots.iter().collect();
    Ok(q
        .all(db)
        .await?
        .into_iter()
        .filter(|r| wanted.contains(&Slot { date: r.date, time: r.time }))
        .collect())
}

async fn require_crew<C: ConnectionTrait>(db: &C, ssns: &[String]) -> Result<Vec<String>, ServiceError> {
    let mut seen = HashSet::new();
    let wanted: Vec<String> = ssns
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| seen.insert(s.clone()))
        .collect();
    if wanted.is_empty() {
        return Err(ServiceError::validation("At least one employee is required"));
    }
    let found: HashSet<String> = employee::Entity::find()
        .filter(employee::Column::Ssn.is_in(wanted.iter().cloned()))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.ssn)
        .collect();
    let missing: Vec<&str> = wanted.iter().filter(|s| !found.contains(*s)).map(String::as_str).collect();
    if !missing.is_empty() {
        return Err(ServiceError::NotFound(format!("Employees with SSNs {} not found", missing.join(", "))));
    }
    Ok(wanted)
}

/// Create one ride per pattern slot, all or nothing.
#[instrument(skip(db, input), fields(stopplan_id = input.stopplan_id, train_id = input.train_id))]
pub async fn create_ride_executions(db: &DatabaseConnection, input: CreateRideExecutions) -> Result<Vec<RideExecutionView>, ServiceError> {
    let slots = input.pattern.expand()?;

    let txn = db.begin().await?;
    let plan = stopplan::Entity::find_by_id(input.stopplan_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Stopplan"))?;
    if train::Entity::find_by_id(input.train_id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Train"));
    }
    let price = input.price.unwrap_or(plan.min_price);
    if !price.is_finite() || price < plan.min_price {
        return Err(ServiceError::validation(format!("price must be at least {:.2}", plan.min_price)));
    }
    let crew_ssns = require_crew(&txn, &input.employee_ssns).await?;

    if let Some(clash) = booked_at(&txn, &slots, Some(input.train_id)).await?.first() {
        return Err(ServiceError::conflict(format!(
            "Train {} already has a ride on {} at {}",
            input.train_id, clash.date, clash.time
        )));
    }

    let mut out = Vec::with_capacity(slots.len());
    for slot in &slots {
        let ride = ride_execution::ActiveModel {
            price: Set(price),
            is_canceled: Set(false),
            delay: Set(0),
            date: Set(slot.date),
            time: Set(slot.time),
            stopplan_id: Set(plan.id),
            train_id: Set(input.train_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let rows = crew_ssns.iter().map(|ssn| ride_execution_employee::ActiveModel {
            ride_execution_id: Set(ride.id),
            employee_ssn: Set(ssn.clone()),
        });
        ride_execution_employee::Entity::insert_many(rows).exec(&txn).await?;
        out.push(RideExecutionView { ride, employee_ssns: crew_ssns.clone() });
    }
    txn.commit().await?;

    info!(rides = out.len(), "ride_executions_created");
    Ok(out)
}

pub async fn get_ride_execution(db: &DatabaseConnection, id: i32) -> Result<Option<RideExecutionView>, ServiceError> {
    match ride_execution::Entity::find_by_id(id).one(db).await? {
        Some(r) => Ok(Some(view(db, r).await?)),
        None => Ok(None),
    }
}

pub async fn list_ride_executions(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<RideExecutionView>, ServiceError> {
    let select = ride_execution::Entity::find()
        .order_by_asc(ride_execution::Column::Date)
        .order_by_asc(ride_execution::Column::Time)
        .order_by_asc(ride_execution::Column::Id);
    let rows = fetch(select, db, page).await?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(view(db, r).await?);
    }
    Ok(out)
}

/// A canceled ride always reports zero delay. Un-canceling needs the slot to be free again.
#[instrument(skip(db, input))]
pub async fn update_ride_execution(db: &DatabaseConnection, id: i32, input: UpdateRideExecution) -> Result<RideExecutionView, ServiceError> {
    if matches!(input.delay, Some(d) if d < 0) {
        return Err(ServiceError::validation("delay must not be negative"));
    }
    let txn = db.begin().await?;
    let current = ride_execution::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Ride execution"))?;

    let canceled = input.is_canceled.unwrap_or(current.is_canceled);
    if current.is_canceled && !canceled {
        let slot = Slot { date: current.date, time: current.time };
        let clash = booked_at(&txn, &[slot], Some(current.train_id)).await?;
        if clash.iter().any(|r| r.id != id) {
            return Err(ServiceError::conflict(format!(
                "Train {} already has a ride on {} at {}",
                current.train_id, slot.date, slot.time
            )));
        }
    }
    let delay = if canceled { 0 } else { input.delay.unwrap_or(current.delay) };
    let mut am: ride_execution::ActiveModel = current.into();
    am.is_canceled = Set(canceled);
    am.delay = Set(delay);
    let updated = am.update(&txn).await?;
    let out = view(&txn, updated).await?;
    txn.commit().await?;
    info!(ride_id = id, canceled, delay, "ride_execution_updated");
    Ok(out)
}

#[instrument(skip(db))]
pub async fn delete_ride_execution(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    if ride_execution::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Ride execution"));
    }
    ride_execution_employee::Entity::delete_many()
        .filter(ride_execution_employee::Column::RideExecutionId.eq(id))
        .exec(&txn)
        .await?;
    ride_execution::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(ride_id = id, "ride_execution_deleted");
    Ok(())
}

/// Trains without a (non-canceled) ride at any slot of `pattern`.
pub async fn available_trains(db: &DatabaseConnection, pattern: &SchedulePattern) -> Result<Vec<TrainView>, ServiceError> {
    let slots = pattern.expand()?;
    let busy: HashSet<i32> = booked_at(db, &slots, None).await?.into_iter().map(|r| r.train_id).collect();
    let trains = list_trains(db, None).await?;
    Ok(trains.into_iter().filter(|t| !busy.contains(&t.id)).collect())
}
