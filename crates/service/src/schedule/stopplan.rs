use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::errors::require_text;
use models::{stopplan, stopplan_station, track, train_station};

use crate::errors::ServiceError;
use crate::guards;
use crate::pagination::{fetch, Pagination};
use crate::track::id_list;
use crate::track::track::track_sections;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStopplan {
    pub name: String,
    pub track_id: i32,
    /// Stops in travel order.
    pub train_station_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStopplan {
    pub name: Option<String>,
    pub track_id: Option<i32>,
    pub train_station_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopplanView {
    pub id: i32,
    pub name: String,
    pub track_id: i32,
    pub min_price: f64,
    pub train_stations: Vec<train_station::Model>,
}

async fn stations<C: ConnectionTrait>(db: &C, stopplan_id: i32) -> Result<Vec<train_station::Model>, ServiceError> {
    let links = stopplan_station::Entity::find()
        .filter(stopplan_station::Column::StopplanId.eq(stopplan_id))
        .order_by_asc(stopplan_station::Column::Position)
        .all(db)
        .await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }
    let mut by_id: HashMap<i32, train_station::Model> = train_station::Entity::find()
        .filter(train_station::Column::Id.is_in(links.iter().map(|l| l.train_station_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    Ok(links.into_iter().filter_map(|l| by_id.remove(&l.train_station_id)).collect())
}

async fn view<C: ConnectionTrait>(db: &C, p: stopplan::Model) -> Result<StopplanView, ServiceError> {
    let train_stations = stations(db, p.id).await?;
    Ok(StopplanView { id: p.id, name: p.name, track_id: p.track_id, min_price: p.min_price, train_stations })
}

/// Check the stops against the track and return the track's minimum price.
async fn plan_stops<C: ConnectionTrait>(db: &C, track_id: i32, station_ids: &[i32]) -> Result<f64, ServiceError> {
    if track::Entity::find_by_id(track_id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("Track"));
    }
    if station_ids.is_empty() {
        return Err(ServiceError::validation("At least one train station is required"));
    }
    let mut seen = HashSet::with_capacity(station_ids.len());
    if let Some(dup) = station_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(ServiceError::validation(format!("Train station {dup} is listed more than once")));
    }

    let found: HashSet<i32> = train_station::Entity::find()
        .filter(train_station::Column::Id.is_in(station_ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();
    let mut missing: Vec<i32> = station_ids.iter().copied().filter(|id| !found.contains(id)).collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(ServiceError::NotFound(format!("Train stations with IDs {} not found", id_list(&missing))));
    }

    let sections = track_sections(db, track_id).await?;
    let on_track: HashSet<i32> = sections
        .iter()
        .flat_map(|s| [s.start_station_id, s.end_station_id])
        .collect();
    if let Some(off) = station_ids.iter().find(|id| !on_track.contains(id)) {
        return Err(ServiceError::validation(format!("Train station {off} is not on track {track_id}")));
    }

    let fees: Vec<f64> = sections.iter().map(|s| s.usage_fee).collect();
    Ok(stopplan::min_price(&fees))
}

async fn store_stops<C: ConnectionTrait>(db: &C, stopplan_id: i32, ids: &[i32]) -> Result<(), ServiceError> {
    stopplan_station::Entity::delete_many()
        .filter(stopplan_station::Column::StopplanId.eq(stopplan_id))
        .exec(db)
        .await?;
    if ids.is_empty() {
        return Ok(());
    }
    let rows = ids.iter().enumerate().map(|(pos, id)| stopplan_station::ActiveModel {
        stopplan_id: Set(stopplan_id),
        train_station_id: Set(*id),
        position: Set(pos as i32),
    });
    stopplan_station::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

#[instrument(skip(db, input), fields(track_id = input.track_id, stops = input.train_station_ids.len()))]
pub async fn create_stopplan(db: &DatabaseConnection, input: CreateStopplan) -> Result<StopplanView, ServiceError> {
    let name = require_text("name", &input.name)?;

    let txn = db.begin().await?;
    let min_price = plan_stops(&txn, input.track_id, &input.train_station_ids).await?;
    let created = stopplan::ActiveModel {
        name: Set(name),
        min_price: Set(min_price),
        track_id: Set(input.track_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    store_stops(&txn, created.id, &input.train_station_ids).await?;
    let out = view(&txn, created).await?;
    txn.commit().await?;
    info!(stopplan_id = out.id, min_price, "stopplan_created");
    Ok(out)
}

pub async fn get_stopplan(db: &DatabaseConnection, id: i32) -> Result<Option<StopplanView>, ServiceError> {
    match stopplan::Entity::find_by_id(id).one(db).await? {
        Some(p) => Ok(Some(view(db, p).await?)),
        None => Ok(None),
    }
}

pub async fn list_stopplans(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<StopplanView>, ServiceError> {
    let rows = fetch(stopplan::Entity::find().order_by_asc(stopplan::Column::Id), db, page).await?;
    let mut out = Vec::with_capacity(rows.len());
    for p in rows {
        out.push(view(db, p).await?);
    }
    Ok(out)
}

/// Moving to another track re-checks the stops and recomputes `minPrice`.
#[instrument(skip(db, input))]
pub async fn update_stopplan(db: &DatabaseConnection, id: i32, input: UpdateStopplan) -> Result<StopplanView, ServiceError> {
    let txn = db.begin().await?;
    let current = stopplan::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Stopplan"))?;

    let mut am: stopplan::ActiveModel = current.clone().into();
    if let Some(n) = &input.name {
        am.name = Set(require_text("name", n)?);
    }
    if input.track_id.is_some() || input.train_station_ids.is_some() {
        let track_id = input.track_id.unwrap_or(current.track_id);
        let station_ids = match &input.train_station_ids {
            Some(ids) => ids.clone(),
            None => stations(&txn, id).await?.into_iter().map(|s| s.id).collect(),
        };
        let min_price = plan_stops(&txn, track_id, &station_ids).await?;
        am.track_id = Set(track_id);
        am.min_price = Set(min_price);
        store_stops(&txn, id, &station_ids).await?;
    }
    let updated = am.update(&txn).await?;
    let out = view(&txn, updated).await?;
    txn.commit().await?;
    info!(stopplan_id = id, "stopplan_updated");
    Ok(out)
}

#[instrument(skip(db))]
pub async fn delete_stopplan(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    if stopplan::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Stopplan"));
    }
    if guards::stopplan_has_rides(&txn, id).await? {
        return Err(ServiceError::conflict("Cannot delete stopplan with existing ride executions"));
    }
    store_stops(&txn, id, &[]).await?;
    stopplan::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(stopplan_id = id, "stopplan_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, section, station};
    use crate::track::track::{create_track, delete_track, CreateTrack};
    use models::enums::TrackGauge;

    /// Track over A -> B -> C with fees 10 and 20; returns (track id, [A, B, C, off-track]).
    async fn fixture(db: &DatabaseConnection) -> anyhow::Result<(i32, [i32; 4])> {
        let a = station(db, "Wien Hauptbahnhof").await?.id;
        let b = station(db, "Linz Hauptbahnhof").await?.id;
        let c = station(db, "Salzburg Hauptbahnhof").await?.id;
        let d = station(db, "Graz Hauptbahnhof").await?.id;
        let s1 = section(db, a, b, TrackGauge::Standard, 10.0).await?;
        let s2 = section(db, b, c, TrackGauge::Standard, 20.0).await?;
        let t = create_track(db, CreateTrack { track_name: "Westbahn".into(), section_ids: vec![s1.id, s2.id] }).await?;
        Ok((t.id, [a, b, c, d]))
    }

    #[tokio::test]
    async fn min_price_is_mean_usage_fee() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let (track_id, [a, _, c, _]) = fixture(&db).await?;
        let p = create_stopplan(&db, CreateStopplan { name: "RJ Wien-Salzburg".into(), track_id, train_station_ids: vec![a, c] }).await?;
        assert_eq!(p.min_price, 15.0);
        let names: Vec<&str> = p.train_stations.iter().map(|s| s.station_name.as_str()).collect();
        assert_eq!(names, vec!["Wien Hauptbahnhof", "Salzburg Hauptbahnhof"]);

        // the track is now locked
        assert!(matches!(delete_track(&db, track_id).await, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn stops_must_lie_on_the_track() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let (track_id, [a, b, _, off]) = fixture(&db).await?;
        let err = create_stopplan(&db, CreateStopplan { name: "X".into(), track_id, train_station_ids: vec![a, off] })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("is not on track")));
        let err = create_stopplan(&db, CreateStopplan { name: "X".into(), track_id, train_station_ids: vec![a, b, a] })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = create_stopplan(&db, CreateStopplan { name: "X".into(), track_id: 404, train_station_ids: vec![a] })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let (track_id, [a, b, c, _]) = fixture(&db).await?;
        let p = create_stopplan(&db, CreateStopplan { name: "R".into(), track_id, train_station_ids: vec![a, b] }).await?;
        let p = update_stopplan(&db, p.id, UpdateStopplan { train_station_ids: Some(vec![a, b, c]), ..Default::default() }).await?;
        assert_eq!(p.train_stations.len(), 3);
        let p = update_stopplan(&db, p.id, UpdateStopplan { name: Some("REX".into()), ..Default::default() }).await?;
        assert_eq!(p.name, "REX");
        assert_eq!(p.train_stations.len(), 3);

        delete_stopplan(&db, p.id).await?;
        assert!(get_stopplan(&db, p.id).await?.is_none());
        delete_track(&db, track_id).await?;
        Ok(())
    }
}
