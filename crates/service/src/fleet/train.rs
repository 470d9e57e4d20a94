use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::enums::CarriageType;
use models::errors::require_text;
use models::{carriage, train, train_passenger_car};

use crate::errors::ServiceError;
use crate::guards;
use crate::pagination::{fetch, Pagination};
use crate::validation::{validate_composition, PassengerCarSpec, RailcarSpec};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrain {
    pub name: String,
    pub railcar_id: i32,
    /// Coupling order, front to back.
    pub passenger_car_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrain {
    pub name: Option<String>,
    pub railcar_id: Option<i32>,
    pub passenger_car_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainView {
    pub id: i32,
    pub name: String,
    pub railcar_id: i32,
    pub passenger_car_ids: Vec<i32>,
}

async fn passenger_car_ids<C: ConnectionTrait>(db: &C, train_id: i32) -> Result<Vec<i32>, ServiceError> {
    let rows = train_passenger_car::Entity::find()
        .filter(train_passenger_car::Column::TrainId.eq(train_id))
        .order_by_asc(train_passenger_car::Column::Position)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.passenger_car_id).collect())
}

async fn view<C: ConnectionTrait>(db: &C, t: train::Model) -> Result<TrainView, ServiceError> {
    let passenger_car_ids = passenger_car_ids(db, t.id).await?;
    Ok(TrainView { id: t.id, name: t.name, railcar_id: t.railcar_id, passenger_car_ids })
}

/// Load the railcar and check no other train already runs it.
async fn load_railcar<C: ConnectionTrait>(db: &C, railcar_id: i32, train_id: Option<i32>) -> Result<RailcarSpec, ServiceError> {
    let rc = carriage::Entity::find_by_id(railcar_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Railcar"))?;
    if rc.carriage_type != CarriageType::Railcar {
        return Err(ServiceError::validation(format!("Carriage {railcar_id} is not a railcar")));
    }
    let taken = train::Entity::find()
        .filter(train::Column::RailcarId.eq(railcar_id))
        .one(db)
        .await?;
    if matches!(taken, Some(other) if Some(other.id) != train_id) {
        return Err(ServiceError::validation("Railcar already assigned to another train"));
    }
    Ok(RailcarSpec {
        id: rc.id,
        track_gauge: rc.track_gauge,
        max_tractive_force: rc.max_tractive_force.unwrap_or_default(),
    })
}

/// Load passenger cars in request order. Unknown ids become one 404 listing them.
async fn load_passenger_cars<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<Vec<PassengerCarSpec>, ServiceError> {
    let rows = carriage::Entity::find()
        .filter(carriage::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;
    let by_id: HashMap<i32, carriage::Model> = rows.into_iter().map(|c| (c.id, c)).collect();

    let mut missing: Vec<i32> = ids.iter().copied().filter(|id| !by_id.contains_key(id)).collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        missing.dedup();
        let list = missing.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ");
        return Err(ServiceError::NotFound(format!("Passenger cars with IDs {list} not found")));
    }

    let mut specs = Vec::with_capacity(ids.len());
    for id in ids {
        let c = &by_id[id];
        if c.carriage_type != CarriageType::PassengerCar {
            return Err(ServiceError::validation(format!("Carriage {id} is not a passenger car")));
        }
        specs.push(PassengerCarSpec { id: c.id, track_gauge: c.track_gauge, max_weight: c.max_weight.unwrap_or_default() });
    }
    Ok(specs)
}

async fn couple<C: ConnectionTrait>(db: &C, train_id: i32, ids: &[i32]) -> Result<(), ServiceError> {
    train_passenger_car::Entity::delete_many()
        .filter(train_passenger_car::Column::TrainId.eq(train_id))
        .exec(db)
        .await?;
    if ids.is_empty() {
        return Ok(());
    }
    let rows = ids.iter().enumerate().map(|(pos, pc)| train_passenger_car::ActiveModel {
        train_id: Set(train_id),
        passenger_car_id: Set(*pc),
        position: Set(pos as i32),
    });
    train_passenger_car::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

#[instrument(skip(db, input), fields(railcar_id = input.railcar_id, cars = input.passenger_car_ids.len()))]
pub async fn create_train(db: &DatabaseConnection, input: CreateTrain) -> Result<TrainView, ServiceError> {
    let name = require_text("name", &input.name)?;

    let txn = db.begin().await?;
    let railcar = load_railcar(&txn, input.railcar_id, None).await?;
    let cars = load_passenger_cars(&txn, &input.passenger_car_ids).await?;
    let load = validate_composition(&railcar, &cars)?;

    let created = train::ActiveModel { name: Set(name), railcar_id: Set(railcar.id), ..Default::default() }
        .insert(&txn)
        .await?;
    couple(&txn, created.id, &input.passenger_car_ids).await?;
    let out = view(&txn, created).await?;
    txn.commit().await?;

    info!(train_id = out.id, load, "train_created");
    Ok(out)
}

pub async fn get_train(db: &DatabaseConnection, id: i32) -> Result<Option<TrainView>, ServiceError> {
    match train::Entity::find_by_id(id).one(db).await? {
        Some(t) => Ok(Some(view(db, t).await?)),
        None => Ok(None),
    }
}

pub async fn list_trains(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<TrainView>, ServiceError> {
    let rows = fetch(train::Entity::find().order_by_asc(train::Column::Id), db, page).await?;
    let mut out = Vec::with_capacity(rows.len());
    for t in rows {
        out.push(view(db, t).await?);
    }
    Ok(out)
}

/// Re-runs the composition check whenever the railcar or the car list changes.
#[instrument(skip(db, input))]
pub async fn update_train(db: &DatabaseConnection, id: i32, input: UpdateTrain) -> Result<TrainView, ServiceError> {
    let txn = db.begin().await?;
    let current = train::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Train"))?;

    let mut am: train::ActiveModel = current.clone().into();
    if let Some(n) = &input.name {
        am.name = Set(require_text("name", n)?);
    }

    if input.railcar_id.is_some() || input.passenger_car_ids.is_some() {
        let railcar_id = input.railcar_id.unwrap_or(current.railcar_id);
        let car_ids = match &input.passenger_car_ids {
            Some(ids) => ids.clone(),
            None => passenger_car_ids(&txn, id).await?,
        };
        let railcar = load_railcar(&txn, railcar_id, Some(id)).await?;
        let cars = load_passenger_cars(&txn, &car_ids).await?;
        validate_composition(&railcar, &cars)?;

        am.railcar_id = Set(railcar_id);
        if input.passenger_car_ids.is_some() {
            couple(&txn, id, &car_ids).await?;
        }
    }

    let updated = am.update(&txn).await?;
    let out = view(&txn, updated).await?;
    txn.commit().await?;
    info!(train_id = id, "train_updated");
    Ok(out)
}

#[instrument(skip(db))]
pub async fn delete_train(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    if train::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Train"));
    }
    if guards::train_has_maintenance(&txn, id).await? {
        return Err(ServiceError::conflict("Cannot delete train with existing maintenance"));
    }
    if guards::train_has_rides(&txn, id).await? {
        return Err(ServiceError::conflict("Cannot delete train with scheduled ride executions"));
    }
    couple(&txn, id, &[]).await?;
    train::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(train_id = id, "train_deleted");
    Ok(())
}
