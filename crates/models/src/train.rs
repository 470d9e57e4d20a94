use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::carriage;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "train")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub railcar_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Railcar,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Railcar => Entity::belongs_to(carriage::Entity)
                .from(Column::RailcarId)
                .to(carriage::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
