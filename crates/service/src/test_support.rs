#![cfg(test)]
//! Fresh in-memory databases and small fixtures for service tests.

use chrono::{NaiveDate, NaiveDateTime};
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use models::db::connect_with_config;
use models::enums::{CarriageType, Department, Role, TrackGauge};
use models::{carriage, employee, section, train_station};

/// Every call returns its own migrated in-memory SQLite database.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
}

pub async fn railcar(db: &DatabaseConnection, gauge: TrackGauge, force: i32) -> anyhow::Result<carriage::Model> {
    let am = carriage::ActiveModel {
        track_gauge: Set(gauge),
        carriage_type: Set(CarriageType::Railcar),
        max_tractive_force: Set(Some(force)),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn passenger_car(db: &DatabaseConnection, gauge: TrackGauge, weight: i32) -> anyhow::Result<carriage::Model> {
    let am = carriage::ActiveModel {
        track_gauge: Set(gauge),
        carriage_type: Set(CarriageType::PassengerCar),
        number_of_seats: Set(Some(50)),
        max_weight: Set(Some(weight)),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn employee(db: &DatabaseConnection, ssn: &str, department: Department) -> anyhow::Result<employee::Model> {
    let am = employee::ActiveModel {
        ssn: Set(ssn.into()),
        first_name: Set("Test".into()),
        last_name: Set(ssn.into()),
        username: Set(format!("test.{ssn}")),
        password_hash: Set(String::new()),
        department: Set(department),
        role: Set(Role::Employee),
    };
    Ok(am.insert(db).await?)
}

pub async fn station(db: &DatabaseConnection, name: &str) -> anyhow::Result<train_station::Model> {
    let am = train_station::ActiveModel {
        station_name: Set(name.into()),
        address: Set("Bahnhofplatz 1, 1010 Wien".into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn section(
    db: &DatabaseConnection,
    from: i32,
    to: i32,
    gauge: TrackGauge,
    usage_fee: f64,
) -> anyhow::Result<section::Model> {
    let am = section::ActiveModel {
        usage_fee: Set(usage_fee),
        length: Set(10.0),
        max_speed: Set(120),
        track_gauge: Set(gauge),
        start_station_id: Set(from),
        end_station_id: Set(to),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
