use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "train_station")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub station_name: String,
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

// "Wien Hauptbahnhof", "St. Pölten Bahnhof", "Linz-Urfahr Bahnhof"
static STATION_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}][\p{L}0-9 .\-]*[Bb]ahnhof$").expect("valid station name regex")
});

// "Am Hauptbahnhof 1, 1100 Wien": street, house number, postcode, town
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}][\p{L} .\-]* \d+[a-zA-Z]?(/\d+)?, \d{4,5} [\p{L}][\p{L} .\-]*$").expect("valid address regex")
});

pub fn validate_station_name(name: &str) -> Result<String, ModelError> {
    let name = name.trim();
    if !STATION_NAME_RE.is_match(name) {
        return Err(ModelError::validation("stationName must end with 'Bahnhof', e.g. 'Wien Hauptbahnhof'"));
    }
    Ok(name.to_string())
}

pub fn validate_address(address: &str) -> Result<String, ModelError> {
    let address = address.trim();
    if !ADDRESS_RE.is_match(address) {
        return Err(ModelError::validation("address must look like 'Straße Nummer, PLZ Ort'"));
    }
    Ok(address.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_names_end_with_bahnhof() {
        assert!(validate_station_name("Wien Hauptbahnhof").is_ok());
        assert!(validate_station_name("St. Pölten Bahnhof").is_ok());
        assert!(validate_station_name("Linz-Urfahr Bahnhof").is_ok());
        assert!(validate_station_name("Wien Mitte").is_err());
        assert!(validate_station_name("").is_err());
    }

    #[test]
    fn addresses_follow_street_number_postcode_town() {
        assert!(validate_address("Am Hauptbahnhof 1, 1100 Wien").is_ok());
        assert!(validate_address("Bahnhofplatz 3a, 4020 Linz").is_ok());
        assert!(validate_address("Hauptstraße 12/4, 3100 St. Pölten").is_ok());
        assert!(validate_address("Bahnhofplatz, Linz").is_err());
        assert!(validate_address("1100 Wien").is_err());
    }
}
