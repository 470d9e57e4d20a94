//! Reference checks that block deletes and edits of records still in use.
//!
//! Each guard only answers "is it referenced?"; callers choose the conflict message.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use models::{
    maintenance, ride_execution, ride_execution_employee, section, stopplan, stopplan_station, track_section, train,
    train_passenger_car,
};

/// A carriage is in use when it is some train's railcar or is coupled to a train.
pub async fn carriage_in_use<C: ConnectionTrait>(db: &C, carriage_id: i32) -> Result<bool, DbErr> {
    let as_railcar = train::Entity::find()
        .filter(train::Column::RailcarId.eq(carriage_id))
        .count(db)
        .await?;
    if as_railcar > 0 {
        return Ok(true);
    }
    let coupled = train_passenger_car::Entity::find()
        .filter(train_passenger_car::Column::PassengerCarId.eq(carriage_id))
        .count(db)
        .await?;
    Ok(coupled > 0)
}

pub async fn train_has_maintenance<C: ConnectionTrait>(db: &C, train_id: i32) -> Result<bool, DbErr> {
    let n = maintenance::Entity::find()
        .filter(maintenance::Column::TrainId.eq(train_id))
        .count(db)
        .await?;
    Ok(n > 0)
}

pub async fn train_has_rides<C: ConnectionTrait>(db: &C, train_id: i32) -> Result<bool, DbErr> {
    let n = ride_execution::Entity::find()
        .filter(ride_execution::Column::TrainId.eq(train_id))
        .count(db)
        .await?;
    Ok(n > 0)
}

pub async fn employee_has_maintenance<C: ConnectionTrait>(db: &C, ssn: &str) -> Result<bool, DbErr> {
    let n = maintenance::Entity::find()
        .filter(maintenance::Column::EmployeeSsn.eq(ssn))
        .count(db)
        .await?;
    Ok(n > 0)
}

/// Maintenance work or ride crew duty.
pub async fn employee_has_assignments<C: ConnectionTrait>(db: &C, ssn: &str) -> Result<bool, DbErr> {
    if employee_has_maintenance(db, ssn).await? {
        return Ok(true);
    }
    let crew = ride_execution_employee::Entity::find()
        .filter(ride_execution_employee::Column::EmployeeSsn.eq(ssn))
        .count(db)
        .await?;
    Ok(crew > 0)
}

pub async fn station_in_section<C: ConnectionTrait>(db: &C, station_id: i32) -> Result<bool, DbErr> {
    let n = section::Entity::find()
        .filter(
            section::Column::StartStationId
                .eq(station_id)
                .or(section::Column::EndStationId.eq(station_id)),
        )
        .count(db)
        .await?;
    Ok(n > 0)
}

pub async fn station_in_stopplan<C: ConnectionTrait>(db: &C, station_id: i32) -> Result<bool, DbErr> {
    let n = stopplan_station::Entity::find()
        .filter(stopplan_station::Column::TrainStationId.eq(station_id))
        .count(db)
        .await?;
    Ok(n > 0)
}

pub async fn section_in_track<C: ConnectionTrait>(db: &C, section_id: i32) -> Result<bool, DbErr> {
    let n = track_section::Entity::find()
        .filter(track_section::Column::SectionId.eq(section_id))
        .count(db)
        .await?;
    Ok(n > 0)
}

pub async fn track_in_stopplan<C: ConnectionTrait>(db: &C, track_id: i32) -> Result<bool, DbErr> {
    let n = stopplan::Entity::find()
        .filter(stopplan::Column::TrackId.eq(track_id))
        .count(db)
        .await?;
    Ok(n > 0)
}

pub async fn stopplan_has_rides<C: ConnectionTrait>(db: &C, stopplan_id: i32) -> Result<bool, DbErr> {
    let n = ride_execution::Entity::find()
        .filter(ride_execution::Column::StopplanId.eq(stopplan_id))
        .count(db)
        .await?;
    Ok(n > 0)
}
