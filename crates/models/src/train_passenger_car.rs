use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{carriage, train};

/// Ordered coupling of a passenger car into a train.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "train_passenger_car")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub train_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub passenger_car_id: i32,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Train,
    PassengerCar,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Train => Entity::belongs_to(train::Entity)
                .from(Column::TrainId)
                .to(train::Column::Id)
                .into(),
            Relation::PassengerCar => Entity::belongs_to(carriage::Entity)
                .from(Column::PassengerCarId)
                .to(carriage::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
