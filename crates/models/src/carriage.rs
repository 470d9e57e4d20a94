use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::{CarriageType, TrackGauge};
use crate::errors::ModelError;

/// Railcars and passenger cars share this table; `carriage_type` decides which
/// of the nullable subtype columns are meaningful.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carriage")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub track_gauge: TrackGauge,
    #[serde(rename = "type")]
    pub carriage_type: CarriageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tractive_force: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seats: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Subtype columns after validation. Fields that do not belong to the subtype are cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarriageShape {
    pub max_tractive_force: Option<i32>,
    pub number_of_seats: Option<i32>,
    pub max_weight: Option<i32>,
}

pub fn validate_shape(
    carriage_type: CarriageType,
    max_tractive_force: Option<i32>,
    number_of_seats: Option<i32>,
    max_weight: Option<i32>,
) -> Result<CarriageShape, ModelError> {
    match carriage_type {
        CarriageType::Railcar => {
            let force = positive("maxTractiveForce", max_tractive_force)?;
            Ok(CarriageShape { max_tractive_force: Some(force), number_of_seats: None, max_weight: None })
        }
        CarriageType::PassengerCar => {
            let seats = positive("numberOfSeats", number_of_seats)?;
            let weight = positive("maxWeight", max_weight)?;
            Ok(CarriageShape { max_tractive_force: None, number_of_seats: Some(seats), max_weight: Some(weight) })
        }
    }
}

fn positive(field: &str, value: Option<i32>) -> Result<i32, ModelError> {
    match value {
        Some(v) if v > 0 => Ok(v),
        Some(_) => Err(ModelError::Validation(format!("{field} must be greater than 0"))),
        None => Err(ModelError::Validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn railcar_needs_positive_force_and_drops_passenger_fields() {
        let shape = validate_shape(CarriageType::Railcar, Some(100), Some(40), Some(10)).unwrap();
        assert_eq!(shape, CarriageShape { max_tractive_force: Some(100), number_of_seats: None, max_weight: None });
        assert!(validate_shape(CarriageType::Railcar, Some(0), None, None).is_err());
        assert!(validate_shape(CarriageType::Railcar, None, None, None).is_err());
    }

    #[test]
    fn passenger_car_needs_seats_and_weight() {
        assert!(validate_shape(CarriageType::PassengerCar, None, Some(50), Some(40)).is_ok());
        assert!(validate_shape(CarriageType::PassengerCar, None, Some(50), None).is_err());
        assert!(validate_shape(CarriageType::PassengerCar, None, Some(-1), Some(40)).is_err());
    }

    #[test]
    fn serializes_type_and_skips_unused_columns() {
        let m = Model {
            id: 1,
            track_gauge: TrackGauge::Standard,
            carriage_type: CarriageType::Railcar,
            max_tractive_force: Some(100),
            number_of_seats: None,
            max_weight: None,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "Railcar");
        assert_eq!(json["trackGauge"], 1435);
        assert!(json.get("maxWeight").is_none());
    }
}
