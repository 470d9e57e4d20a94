use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::errors::require_text;
use models::{section, track, track_section};

use crate::errors::ServiceError;
use crate::guards;
use crate::pagination::{fetch, Pagination};
use crate::validation::{order_sections, SectionLink};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrack {
    pub track_name: String,
    /// Any order; stored in path order.
    pub section_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrack {
    pub track_name: Option<String>,
    pub section_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackView {
    pub id: i32,
    pub track_name: String,
    pub sections: Vec<section::Model>,
}

/// Sections of a track in path order.
pub async fn track_sections<C: ConnectionTrait>(db: &C, track_id: i32) -> Result<Vec<section::Model>, ServiceError> {
    let links = track_section::Entity::find()
        .filter(track_section::Column::TrackId.eq(track_id))
        .order_by_asc(track_section::Column::Position)
        .all(db)
        .await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }
    let mut by_id: HashMap<i32, section::Model> = section::Entity::find()
        .filter(section::Column::Id.is_in(links.iter().map(|l| l.section_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    Ok(links.into_iter().filter_map(|l| by_id.remove(&l.section_id)).collect())
}

async fn view<C: ConnectionTrait>(db: &C, t: track::Model) -> Result<TrackView, ServiceError> {
    let sections = track_sections(db, t.id).await?;
    Ok(TrackView { id: t.id, track_name: t.track_name, sections })
}

/// Load the requested sections and return their ids in path order.
async fn ordered_section_ids<C: ConnectionTrait>(db: &C, requested: &[i32]) -> Result<Vec<i32>, ServiceError> {
    let found: Vec<SectionLink> = section::Entity::find()
        .filter(section::Column::Id.is_in(requested.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|s| SectionLink {
            id: s.id,
            track_gauge: s.track_gauge,
            start_station_id: s.start_station_id,
            end_station_id: s.end_station_id,
        })
        .collect();
    Ok(order_sections(requested, &found)?)
}

async fn store_sections<C: ConnectionTrait>(db: &C, track_id: i32, ordered: &[i32]) -> Result<(), ServiceError> {
    track_section::Entity::delete_many()
        .filter(track_section::Column::TrackId.eq(track_id))
        .exec(db)
        .await?;
    if ordered.is_empty() {
        return Ok(());
    }
    let rows = ordered.iter().enumerate().map(|(pos, id)| track_section::ActiveModel {
        track_id: Set(track_id),
        section_id: Set(*id),
        position: Set(pos as i32),
    });
    track_section::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

#[instrument(skip(db, input), fields(name = %input.track_name, sections = input.section_ids.len()))]
pub async fn create_track(db: &DatabaseConnection, input: CreateTrack) -> Result<TrackView, ServiceError> {
    let track_name = require_text("trackName", &input.track_name)?;

    let txn = db.begin().await?;
    let ordered = ordered_section_ids(&txn, &input.section_ids).await?;
    let created = track::ActiveModel { track_name: Set(track_name), ..Default::default() }
        .insert(&txn)
        .await?;
    store_sections(&txn, created.id, &ordered).await?;
    let out = view(&txn, created).await?;
    txn.commit().await?;
    info!(track_id = out.id, "track_created");
    Ok(out)
}

pub async fn get_track(db: &DatabaseConnection, id: i32) -> Result<Option<TrackView>, ServiceError> {
    match track::Entity::find_by_id(id).one(db).await? {
        Some(t) => Ok(Some(view(db, t).await?)),
        None => Ok(None),
    }
}

pub async fn list_tracks(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<TrackView>, ServiceError> {
    let rows = fetch(track::Entity::find().order_by_asc(track::Column::Id), db, page).await?;
    let mut out = Vec::with_capacity(rows.len());
    for t in rows {
        out.push(view(db, t).await?);
    }
    Ok(out)
}

#[instrument(skip(db, input))]
pub async fn update_track(db: &DatabaseConnection, id: i32, input: UpdateTrack) -> Result<TrackView, ServiceError> {
    let txn = db.begin().await?;
    let current = track::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Track"))?;

    if let Some(requested) = &input.section_ids {
        let ordered = ordered_section_ids(&txn, requested).await?;
        let existing: Vec<i32> = track_sections(&txn, id).await?.into_iter().map(|s| s.id).collect();
        if ordered != existing {
            if guards::track_in_stopplan(&txn, id).await? {
                return Err(ServiceError::conflict("Cannot change sections of a track used by a stopplan"));
            }
            store_sections(&txn, id, &ordered).await?;
        }
    }

    let mut am: track::ActiveModel = current.into();
    if let Some(n) = &input.track_name {
        am.track_name = Set(require_text("trackName", n)?);
    }
    let updated = am.update(&txn).await?;
    let out = view(&txn, updated).await?;
    txn.commit().await?;
    info!(track_id = id, "track_updated");
    Ok(out)
}

#[instrument(skip(db))]
pub async fn delete_track(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    if track::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Track"));
    }
    if guards::track_in_stopplan(&txn, id).await? {
        return Err(ServiceError::conflict("Cannot delete track used by a stopplan"));
    }
    store_sections(&txn, id, &[]).await?;
    track::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(track_id = id, "track_deleted");
    Ok(())
}
