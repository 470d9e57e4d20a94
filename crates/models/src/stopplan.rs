use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::track;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stopplan")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub min_price: f64,
    pub track_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Track,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Track => Entity::belongs_to(track::Entity)
                .from(Column::TrackId)
                .to(track::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Mean usage fee over the track's sections, 0 for an empty track.
pub fn min_price(usage_fees: &[f64]) -> f64 {
    if usage_fees.is_empty() {
        return 0.0;
    }
    usage_fees.iter().sum::<f64>() / usage_fees.len() as f64
}

#[cfg(test)]
mod tests {
    use super::min_price;

    #[test]
    fn averages_usage_fees() {
        assert_eq!(min_price(&[]), 0.0);
        assert_eq!(min_price(&[10.0]), 10.0);
        assert!((min_price(&[10.0, 20.0, 45.0]) - 25.0).abs() < 1e-9);
    }
}
