use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use models::train_station::{self, validate_address, validate_station_name};

use crate::errors::ServiceError;
use crate::guards;
use crate::pagination::{fetch, Pagination};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStation {
    pub station_name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStation {
    pub station_name: Option<String>,
    pub address: Option<String>,
}

async fn name_taken(db: &DatabaseConnection, name: &str, except_id: Option<i32>) -> Result<bool, ServiceError> {
    let mut q = train_station::Entity::find().filter(train_station::Column::StationName.eq(name));
    if let Some(id) = except_id {
        q = q.filter(train_station::Column::Id.ne(id));
    }
    Ok(q.count(db).await? > 0)
}

#[instrument(skip(db, input), fields(name = %input.station_name))]
pub async fn create_station(db: &DatabaseConnection, input: CreateStation) -> Result<train_station::Model, ServiceError> {
    let station_name = validate_station_name(&input.station_name)?;
    let address = validate_address(&input.address)?;
    if name_taken(db, &station_name, None).await? {
        return Err(ServiceError::conflict("Train station with this name already exists"));
    }
    let created = train_station::ActiveModel { station_name: Set(station_name), address: Set(address), ..Default::default() }
        .insert(db)
        .await?;
    info!(station_id = created.id, "station_created");
    Ok(created)
}

pub async fn get_station(db: &DatabaseConnection, id: i32) -> Result<Option<train_station::Model>, ServiceError> {
    Ok(train_station::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_stations(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<train_station::Model>, ServiceError> {
    let select = train_station::Entity::find().order_by_asc(train_station::Column::StationName);
    Ok(fetch(select, db, page).await?)
}

#[instrument(skip(db, input))]
pub async fn update_station(db: &DatabaseConnection, id: i32, input: UpdateStation) -> Result<train_station::Model, ServiceError> {
    let current = train_station::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Train station"))?;
    if guards::station_in_section(db, id).await? {
        return Err(ServiceError::conflict("Cannot edit train station used by a section"));
    }

    let mut am: train_station::ActiveModel = current.into();
    if let Some(n) = &input.station_name {
        let n = validate_station_name(n)?;
        if name_taken(db, &n, Some(id)).await? {
            return Err(ServiceError::conflict("Train station with this name already exists"));
        }
        am.station_name = Set(n);
    }
    if let Some(a) = &input.address { am.address = Set(validate_address(a)?); }
    let updated = am.update(db).await?;
    info!(station_id = id, "station_updated");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete_station(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    if train_station::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("Train station"));
    }
    if guards::station_in_section(db, id).await? {
        return Err(ServiceError::conflict("Cannot delete train station used by a section"));
    }
    if guards::station_in_stopplan(db, id).await? {
        return Err(ServiceError::conflict("Cannot delete train station used by a stopplan"));
    }
    train_station::Entity::delete_by_id(id).exec(db).await?;
    info!(station_id = id, "station_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::stopplan::{create_stopplan, CreateStopplan};
    use crate::test_support::{get_db, section};
    use crate::track::track::{create_track, CreateTrack};
    use models::enums::TrackGauge;
    use models::stopplan_station;

    fn input(name: &str) -> CreateStation {
        CreateStation { station_name: name.into(), address: "Am Hauptbahnhof 1, 1100 Wien".into() }
    }

    #[tokio::test]
    async fn station_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = create_station(&db, input("Wien Hauptbahnhof")).await?;
        assert!(matches!(create_station(&db, input("Wien Hauptbahnhof")).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(create_station(&db, input("Wien Mitte")).await, Err(ServiceError::Model(_))));

        let s = update_station(&db, s.id, UpdateStation { address: Some("Bahnhofplatz 2, 4020 Linz".into()), ..Default::default() }).await?;
        assert_eq!(s.address, "Bahnhofplatz 2, 4020 Linz");
        delete_station(&db, s.id).await?;
        assert!(get_station(&db, s.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn stations_on_a_section_are_locked() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let a = create_station(&db, input("Linz Bahnhof")).await?;
        let b = create_station(&db, input("Wels Bahnhof")).await?;
        section(&db, a.id, b.id, TrackGauge::Standard, 10.0).await?;

        assert!(matches!(delete_station(&db, b.id).await, Err(ServiceError::Conflict(_))));
        let err = update_station(&db, a.id, UpdateStation { station_name: Some("Linz Hauptbahnhof".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Cannot edit train station used by a section"));
        Ok(())
    }

    #[tokio::test]
    async fn referenced_stations_cannot_be_deleted() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let a = create_station(&db, input("Linz Bahnhof")).await?;
        let b = create_station(&db, input("Wels Bahnhof")).await?;
        let c = create_station(&db, input("Enns Bahnhof")).await?;
        let s = section(&db, a.id, b.id, TrackGauge::Standard, 10.0).await?;
        let t = create_track(&db, CreateTrack { track_name: "Westbahn".into(), section_ids: vec![s.id] }).await?;
        let p = create_stopplan(&db, CreateStopplan { name: "R".into(), track_id: t.id, train_station_ids: vec![a.id, b.id] }).await?;
        // a stop that no section touches
        stopplan_station::Entity::insert(stopplan_station::ActiveModel {
            stopplan_id: Set(p.id),
            train_station_id: Set(c.id),
            position: Set(2),
        })
        .exec(&db)
        .await?;

        let err = delete_station(&db, a.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Cannot delete train station used by a section"));
        let err = delete_station(&db, c.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Cannot delete train station used by a stopplan"));
        assert_eq!(list_stations(&db, None).await?.len(), 3);
        Ok(())
    }
}
