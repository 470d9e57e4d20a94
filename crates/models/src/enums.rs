//! Enumerated columns stored as short strings.

use std::fmt;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Department {
    #[sea_orm(string_value = "Crew")]
    Crew,
    #[sea_orm(string_value = "Maintenance")]
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[sea_orm(string_value = "Employee")]
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CarriageType {
    #[sea_orm(string_value = "Railcar")]
    Railcar,
    #[sea_orm(string_value = "PassengerCar")]
    PassengerCar,
}

/// Rail spacing in millimetres. Only metre gauge and standard gauge are in service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum TrackGauge {
    #[sea_orm(string_value = "1000")]
    Metre,
    #[sea_orm(string_value = "1435")]
    Standard,
}

impl TrackGauge {
    pub fn millimetres(self) -> u16 {
        match self {
            TrackGauge::Metre => 1000,
            TrackGauge::Standard => 1435,
        }
    }

    pub fn from_millimetres(mm: u64) -> Option<Self> {
        match mm {
            1000 => Some(TrackGauge::Metre),
            1435 => Some(TrackGauge::Standard),
            _ => None,
        }
    }
}

impl fmt::Display for TrackGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.millimetres())
    }
}

impl Serialize for TrackGauge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.millimetres())
    }
}

// Clients send the gauge either as a number or as a numeric string.
impl<'de> Deserialize<'de> for TrackGauge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u64),
            Text(String),
        }

        let mm = match Repr::deserialize(deserializer)? {
            Repr::Num(n) => n,
            Repr::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| de::Error::custom("trackGauge must be 1000 or 1435"))?,
        };
        TrackGauge::from_millimetres(mm).ok_or_else(|| de::Error::custom("trackGauge must be 1000 or 1435"))
    }
}
