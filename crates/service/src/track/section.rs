use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::enums::TrackGauge;
use models::section::{self, validate_endpoints, validate_measures};
use models::{section_warning, train_station, warning};

use super::id_list;
use super::warning::{active_at, local_now};
use crate::errors::ServiceError;
use crate::guards;
use crate::pagination::{fetch, Pagination};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSection {
    pub usage_fee: f64,
    pub length: f64,
    pub max_speed: i32,
    pub track_gauge: TrackGauge,
    pub start_station_id: i32,
    pub end_station_id: i32,
    #[serde(default)]
    pub warning_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSection {
    pub usage_fee: Option<f64>,
    pub length: Option<f64>,
    pub max_speed: Option<i32>,
    pub track_gauge: Option<TrackGauge>,
    pub start_station_id: Option<i32>,
    pub end_station_id: Option<i32>,
    /// Replaces the linked warnings.
    pub warning_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    #[serde(flatten)]
    pub section: section::Model,
    pub warnings: Vec<warning::Model>,
}

impl UpdateSection {
    fn touches_geometry(&self) -> bool {
        self.usage_fee.is_some()
            || self.length.is_some()
            || self.max_speed.is_some()
            || self.track_gauge.is_some()
            || self.start_station_id.is_some()
            || self.end_station_id.is_some()
    }
}

async fn active_warnings<C: ConnectionTrait>(db: &C, section_id: i32) -> Result<Vec<warning::Model>, ServiceError> {
    let links = section_warning::Entity::find()
        .filter(section_warning::Column::SectionId.eq(section_id))
        .all(db)
        .await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }
    Ok(warning::Entity::find()
        .filter(warning::Column::Id.is_in(links.into_iter().map(|l| l.warning_id)))
        .filter(active_at(local_now()))
        .order_by_asc(warning::Column::StartDate)
        .all(db)
        .await?)
}

async fn view<C: ConnectionTrait>(db: &C, s: section::Model) -> Result<SectionView, ServiceError> {
    let warnings = active_warnings(db, s.id).await?;
    Ok(SectionView { section: s, warnings })
}

async fn require_stations<C: ConnectionTrait>(db: &C, ids: [i32; 2]) -> Result<(), ServiceError> {
    let found = train_station::Entity::find()
        .filter(train_station::Column::Id.is_in(ids))
        .all(db)
        .await?;
    let found: HashSet<i32> = found.into_iter().map(|s| s.id).collect();
    let mut missing: Vec<i32> = ids.into_iter().filter(|id| !found.contains(id)).collect();
    missing.dedup();
    if !missing.is_empty() {
        return Err(ServiceError::NotFound(format!("Train stations with IDs {} not found", id_list(&missing))));
    }
    Ok(())
}

async fn link_warnings<C: ConnectionTrait>(db: &C, section_id: i32, ids: &[i32]) -> Result<(), ServiceError> {
    let wanted: Vec<i32> = {
        let mut seen = HashSet::new();
        ids.iter().copied().filter(|id| seen.insert(*id)).collect()
    };
    if !wanted.is_empty() {
        let found: HashSet<i32> = warning::Entity::find()
            .filter(warning::Column::Id.is_in(wanted.iter().copied()))
            .all(db)
            .await?
            .into_iter()
            .map(|w| w.id)
            .collect();
        let mut missing: Vec<i32> = wanted.iter().copied().filter(|id| !found.contains(id)).collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(ServiceError::NotFound(format!("Warnings with IDs {} not found", id_list(&missing))));
        }
    }

    section_warning::Entity::delete_many()
        .filter(section_warning::Column::SectionId.eq(section_id))
        .exec(db)
        .await?;
    if wanted.is_empty() {
        return Ok(());
    }
    let rows = wanted
        .into_iter()
        .map(|warning_id| section_warning::ActiveModel { section_id: Set(section_id), warning_id: Set(warning_id) });
    section_warning::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

#[instrument(skip(db, input), fields(from = input.start_station_id, to = input.end_station_id))]
pub async fn create_section(db: &DatabaseConnection, input: CreateSection) -> Result<SectionView, ServiceError> {
    validate_measures(input.usage_fee, input.length, input.max_speed)?;
    validate_endpoints(input.start_station_id, input.end_station_id)?;

    let txn = db.begin().await?;
    require_stations(&txn, [input.start_station_id, input.end_station_id]).await?;
    let created = section::ActiveModel {
        usage_fee: Set(input.usage_fee),
        length: Set(input.length),
        max_speed: Set(input.max_speed),
        track_gauge: Set(input.track_gauge),
        start_station_id: Set(input.start_station_id),
        end_station_id: Set(input.end_station_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    link_warnings(&txn, created.id, &input.warning_ids).await?;
    let out = view(&txn, created).await?;
    txn.commit().await?;
    info!(section_id = out.section.id, "section_created");
    Ok(out)
}

pub async fn get_section(db: &DatabaseConnection, id: i32) -> Result<Option<SectionView>, ServiceError> {
    match section::Entity::find_by_id(id).one(db).await? {
        Some(s) => Ok(Some(view(db, s).await?)),
        None => Ok(None),
    }
}

pub async fn list_sections(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<SectionView>, ServiceError> {
    let rows = fetch(section::Entity::find().order_by_asc(section::Column::Id), db, page).await?;
    let mut out = Vec::with_capacity(rows.len());
    for s in rows {
        out.push(view(db, s).await?);
    }
    Ok(out)
}

/// Changing warnings is always allowed; any other field is locked once a track uses the section.
#[instrument(skip(db, input))]
pub async fn update_section(db: &DatabaseConnection, id: i32, input: UpdateSection) -> Result<SectionView, ServiceError> {
    let txn = db.begin().await?;
    let current = section::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Section"))?;

    if input.touches_geometry() {
        if guards::section_in_track(&txn, id).await? {
            return Err(ServiceError::conflict("Cannot edit section assigned to a track"));
        }
        let usage_fee = input.usage_fee.unwrap_or(current.usage_fee);
        let length = input.length.unwrap_or(current.length);
        let max_speed = input.max_speed.unwrap_or(current.max_speed);
        let start = input.start_station_id.unwrap_or(current.start_station_id);
        let end = input.end_station_id.unwrap_or(current.end_station_id);
        validate_measures(usage_fee, length, max_speed)?;
        validate_endpoints(start, end)?;
        require_stations(&txn, [start, end]).await?;

        let mut am: section::ActiveModel = current.clone().into();
        am.usage_fee = Set(usage_fee);
        am.length = Set(length);
        am.max_speed = Set(max_speed);
        if let Some(g) = input.track_gauge { am.track_gauge = Set(g); }
        am.start_station_id = Set(start);
        am.end_station_id = Set(end);
        am.update(&txn).await?;
    }
    if let Some(ids) = &input.warning_ids {
        link_warnings(&txn, id, ids).await?;
    }

    let updated = section::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Section"))?;
    let out = view(&txn, updated).await?;
    txn.commit().await?;
    info!(section_id = id, "section_updated");
    Ok(out)
}

#[instrument(skip(db))]
pub async fn delete_section(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    if section::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Section"));
    }
    if guards::section_in_track(&txn, id).await? {
        return Err(ServiceError::conflict("Cannot delete section assigned to a track"));
    }
    link_warnings(&txn, id, &[]).await?;
    section::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(section_id = id, "section_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, station};
    use crate::track::warning::{create_warning, CreateWarning};
    use chrono::Duration;

    fn input(from: i32, to: i32) -> CreateSection {
        CreateSection {
            usage_fee: 12.5,
            length: 30.0,
            max_speed: 160,
            track_gauge: TrackGauge::Standard,
            start_station_id: from,
            end_station_id: to,
            warning_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn section_with_warnings() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let a = station(&db, "Linz Bahnhof").await?;
        let b = station(&db, "Wels Bahnhof").await?;
        let w = create_warning(
            &db,
            CreateWarning {
                warning_name: "Weichentausch".into(),
                description: String::new(),
                start_date: local_now() + Duration::days(1),
                end_date: None,
            },
        )
        .await?;

        let s = create_section(&db, CreateSection { warning_ids: vec![w.id, w.id], ..input(a.id, b.id) }).await?;
        assert_eq!(s.warnings.len(), 1);
        let json = serde_json::to_value(&s)?;
        assert_eq!(json["usageFee"], 12.5);
        assert_eq!(json["trackGauge"], 1435);
        assert_eq!(json["warnings"][0]["warningName"], "Weichentausch");

        let s = update_section(&db, s.section.id, UpdateSection { warning_ids: Some(vec![]), ..Default::default() }).await?;
        assert!(s.warnings.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn stations_must_exist_and_differ() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let a = station(&db, "Linz Bahnhof").await?;
        assert!(matches!(create_section(&db, input(a.id, a.id)).await, Err(ServiceError::Model(_))));
        let err = create_section(&db, input(a.id, 77)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Train stations with IDs 77 not found"));
        let err = create_section(&db, CreateSection { warning_ids: vec![5], ..input(a.id, station(&db, "Enns Bahnhof").await?.id) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(list_sections(&db, None).await?.is_empty());
        Ok(())
    }
}
