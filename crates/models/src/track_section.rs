use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{section, track};

/// Membership of a section in a track; `position` is the index along the path.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "track_section")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub track_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub section_id: i32,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Track,
    Section,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Track => Entity::belongs_to(track::Entity)
                .from(Column::TrackId)
                .to(track::Column::Id)
                .into(),
            Relation::Section => Entity::belongs_to(section::Entity)
                .from(Column::SectionId)
                .to(section::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
