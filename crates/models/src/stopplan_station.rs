use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{stopplan, train_station};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stopplan_station")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub stopplan_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub train_station_id: i32,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Stopplan,
    TrainStation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Stopplan => Entity::belongs_to(stopplan::Entity)
                .from(Column::StopplanId)
                .to(stopplan::Column::Id)
                .into(),
            Relation::TrainStation => Entity::belongs_to(train_station::Entity)
                .from(Column::TrainStationId)
                .to(train_station::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
