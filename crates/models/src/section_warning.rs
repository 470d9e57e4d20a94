use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{section, warning};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "section_warning")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub section_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub warning_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Section,
    Warning,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Section => Entity::belongs_to(section::Entity)
                .from(Column::SectionId)
                .to(section::Column::Id)
                .into(),
            Relation::Warning => Entity::belongs_to(warning::Entity)
                .from(Column::WarningId)
                .to(warning::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
