use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use models::carriage::{self, validate_shape};
use models::enums::{CarriageType, TrackGauge};

use crate::errors::ServiceError;
use crate::guards;
use crate::pagination::{fetch, Pagination};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarriage {
    pub track_gauge: TrackGauge,
    #[serde(rename = "type")]
    pub carriage_type: CarriageType,
    pub max_tractive_force: Option<i32>,
    pub number_of_seats: Option<i32>,
    pub max_weight: Option<i32>,
}

/// Partial update. Changing `type` re-validates the subtype fields against the new type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarriage {
    pub track_gauge: Option<TrackGauge>,
    #[serde(rename = "type")]
    pub carriage_type: Option<CarriageType>,
    pub max_tractive_force: Option<i32>,
    pub number_of_seats: Option<i32>,
    pub max_weight: Option<i32>,
}

#[instrument(skip(db, input), fields(kind = ?input.carriage_type, gauge = %input.track_gauge))]
pub async fn create_carriage(db: &DatabaseConnection, input: CreateCarriage) -> Result<carriage::Model, ServiceError> {
    let shape = validate_shape(input.carriage_type, input.max_tractive_force, input.number_of_seats, input.max_weight)?;
    let am = carriage::ActiveModel {
        track_gauge: Set(input.track_gauge),
        carriage_type: Set(input.carriage_type),
        max_tractive_force: Set(shape.max_tractive_force),
        number_of_seats: Set(shape.number_of_seats),
        max_weight: Set(shape.max_weight),
        ..Default::default()
    };
    let model = am.insert(db).await?;
    info!(carriage_id = model.id, "carriage_created");
    Ok(model)
}

pub async fn get_carriage(db: &DatabaseConnection, id: i32) -> Result<Option<carriage::Model>, ServiceError> {
    Ok(carriage::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_carriages(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<carriage::Model>, ServiceError> {
    let select = carriage::Entity::find().order_by_asc(carriage::Column::Id);
    Ok(fetch(select, db, page).await?)
}

#[instrument(skip(db, input))]
pub async fn update_carriage(db: &DatabaseConnection, id: i32, input: UpdateCarriage) -> Result<carriage::Model, ServiceError> {
    let current = carriage::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Carriage"))?;
    if guards::carriage_in_use(db, id).await? {
        return Err(ServiceError::conflict("Cannot edit carriage assigned to a train"));
    }

    let kind = input.carriage_type.unwrap_or(current.carriage_type);
    let shape = validate_shape(
        kind,
        input.max_tractive_force.or(current.max_tractive_force),
        input.number_of_seats.or(current.number_of_seats),
        input.max_weight.or(current.max_weight),
    )?;

    let mut am: carriage::ActiveModel = current.into();
    if let Some(g) = input.track_gauge { am.track_gauge = Set(g); }
    am.carriage_type = Set(kind);
    am.max_tractive_force = Set(shape.max_tractive_force);
    am.number_of_seats = Set(shape.number_of_seats);
    am.max_weight = Set(shape.max_weight);
    let updated = am.update(db).await?;
    info!(carriage_id = id, "carriage_updated");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete_carriage(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    if carriage::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("Carriage"));
    }
    if guards::carriage_in_use(db, id).await? {
        return Err(ServiceError::conflict("Cannot delete carriage assigned to a train"));
    }
    carriage::Entity::delete_by_id(id).exec(db).await?;
    info!(carriage_id = id, "carriage_deleted");
    Ok(())
}
