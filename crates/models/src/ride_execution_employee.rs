use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{employee, ride_execution};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ride_execution_employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ride_execution_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_ssn: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    RideExecution,
    Employee,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::RideExecution => Entity::belongs_to(ride_execution::Entity)
                .from(Column::RideExecutionId)
                .to(ride_execution::Column::Id)
                .into(),
            Relation::Employee => Entity::belongs_to(employee::Entity)
                .from(Column::EmployeeSsn)
                .to(employee::Column::Ssn)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
