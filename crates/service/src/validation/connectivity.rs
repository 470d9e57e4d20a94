use std::collections::{HashMap, HashSet};

use models::enums::TrackGauge;

use super::ValidationError;

/// The parts of a section the path check needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionLink {
    pub id: i32,
    pub track_gauge: TrackGauge,
    pub start_station_id: i32,
    pub end_station_id: i32,
}

/// Validate that `requested` section ids form one simple path and return them in
/// path order, from the single start station to the single end station.
///
/// `found` holds whatever rows the caller could load for `requested`; ids absent
/// from it are reported as missing.
pub fn order_sections(requested: &[i32], found: &[SectionLink]) -> Result<Vec<i32>, ValidationError> {
    if requested.is_empty() {
        return Err(ValidationError::EmptyTrack);
    }
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(ValidationError::DuplicateSection(*id));
        }
    }

    let by_id: HashMap<i32, &SectionLink> = found.iter().map(|s| (s.id, s)).collect();
    let mut missing: Vec<i32> = requested.iter().copied().filter(|id| !by_id.contains_key(id)).collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(ValidationError::MissingSections(missing));
    }
    let links: Vec<&SectionLink> = requested.iter().filter_map(|id| by_id.get(id).copied()).collect();

    let gauge = links[0].track_gauge;
    if links.iter().any(|s| s.track_gauge != gauge) {
        return Err(ValidationError::SectionGaugeMismatch);
    }

    // a station leaving or entering twice means the sections branch
    let mut by_start: HashMap<i32, &SectionLink> = HashMap::with_capacity(links.len());
    let mut ends: HashSet<i32> = HashSet::with_capacity(links.len());
    for s in &links {
        if by_start.insert(s.start_station_id, s).is_some() || !ends.insert(s.end_station_id) {
            return Err(ValidationError::DisconnectedChain);
        }
    }

    // starts and ends are both one per section, so a unique start implies a unique end
    let starts_only: Vec<i32> = by_start.keys().copied().filter(|st| !ends.contains(st)).collect();
    let [head] = starts_only[..] else {
        return Err(ValidationError::NoUniqueStart);
    };

    let mut ordered = Vec::with_capacity(links.len());
    let mut station = head;
    while let Some(s) = by_start.get(&station) {
        if ordered.len() == links.len() {
            break;
        }
        ordered.push(s.id);
        station = s.end_station_id;
    }
    if ordered.len() != links.len() {
        return Err(ValidationError::DisconnectedChain);
    }
    Ok(ordered)
}
