use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{stopplan, train};

/// One concrete run of a stop plan at `date`/`time`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ride_execution")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub price: f64,
    pub is_canceled: bool,
    pub delay: i32,
    pub date: Date,
    pub time: Time,
    pub stopplan_id: i32,
    pub train_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Stopplan,
    Train,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Stopplan => Entity::belongs_to(stopplan::Entity)
                .from(Column::StopplanId)
                .to(stopplan::Column::Id)
                .into(),
            Relation::Train => Entity::belongs_to(train::Entity)
                .from(Column::TrainId)
                .to(train::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
