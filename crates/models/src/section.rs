use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::TrackGauge;
use crate::errors::ModelError;
use crate::train_station;

/// Directed rail segment from `start_station_id` to `end_station_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "section")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub usage_fee: f64,
    pub length: f64,
    pub max_speed: i32,
    pub track_gauge: TrackGauge,
    pub start_station_id: i32,
    pub end_station_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    StartStation,
    EndStation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::StartStation => Entity::belongs_to(train_station::Entity)
                .from(Column::StartStationId)
                .to(train_station::Column::Id)
                .into(),
            Relation::EndStation => Entity::belongs_to(train_station::Entity)
                .from(Column::EndStationId)
                .to(train_station::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_measures(usage_fee: f64, length: f64, max_speed: i32) -> Result<(), ModelError> {
    if !(usage_fee.is_finite() && usage_fee > 0.0) {
        return Err(ModelError::validation("usageFee must be greater than 0"));
    }
    if !(length.is_finite() && length > 0.0) {
        return Err(ModelError::validation("length must be greater than 0"));
    }
    if max_speed <= 0 {
        return Err(ModelError::validation("maxSpeed must be greater than 0"));
    }
    Ok(())
}

pub fn validate_endpoints(start_station_id: i32, end_station_id: i32) -> Result<(), ModelError> {
    if start_station_id == end_station_id {
        return Err(ModelError::validation("Start and end station must differ"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_must_be_positive() {
        assert!(validate_measures(12.5, 3.2, 120).is_ok());
        assert!(validate_measures(0.0, 3.2, 120).is_err());
        assert!(validate_measures(1.0, -1.0, 120).is_err());
        assert!(validate_measures(1.0, 1.0, 0).is_err());
        assert!(validate_measures(f64::NAN, 1.0, 10).is_err());
    }

    #[test]
    fn loops_are_rejected() {
        assert!(validate_endpoints(1, 2).is_ok());
        assert!(validate_endpoints(4, 4).is_err());
    }
}
