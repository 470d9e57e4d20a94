use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{employee, train};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_ssn: String,
    pub train_id: i32,
    pub from_time: DateTime,
    pub to_time: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Employee,
    Train,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Employee => Entity::belongs_to(employee::Entity)
                .from(Column::EmployeeSsn)
                .to(employee::Column::Ssn)
                .into(),
            Relation::Train => Entity::belongs_to(train::Entity)
                .from(Column::TrainId)
                .to(train::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
