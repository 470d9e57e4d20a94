use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warning")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub warning_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub start_date: DateTime,
    pub end_date: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Expired once the end date lies in the past.
    pub fn is_expired(&self, now: DateTime) -> bool {
        matches!(self.end_date, Some(end) if end < now)
    }
}

pub fn validate_period(start: DateTime, end: Option<DateTime>) -> Result<(), ModelError> {
    if let Some(end) = end {
        if end <= start {
            return Err(ModelError::validation("endDate must be after startDate"));
        }
    }
    Ok(())
}

pub fn validate_start_in_future(start: DateTime, now: DateTime) -> Result<(), ModelError> {
    if start <= now {
        return Err(ModelError::validation("startDate must be in the future"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> DateTime {
        NaiveDate::from_ymd_opt(2030, 1, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn end_must_follow_start() {
        assert!(validate_period(at(1, 8), Some(at(1, 9))).is_ok());
        assert!(validate_period(at(1, 8), None).is_ok());
        assert!(validate_period(at(1, 8), Some(at(1, 8))).is_err());
        assert!(validate_period(at(2, 8), Some(at(1, 8))).is_err());
    }

    #[test]
    fn expiry_only_applies_to_closed_periods() {
        let mut w = Model {
            id: 1,
            warning_name: "Bauarbeiten".into(),
            description: String::new(),
            start_date: at(1, 0),
            end_date: Some(at(2, 0)),
        };
        assert!(w.is_expired(at(3, 0)));
        assert!(!w.is_expired(at(1, 12)));
        w.end_date = None;
        assert!(!w.is_expired(at(20, 0)));
    }
}
