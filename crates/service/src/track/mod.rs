//! Track service: stations, sections between them, warnings on sections and
//! tracks built from connected sections.

pub mod section;
pub mod station;
pub mod track;
pub mod warning;

/// Render ids as `1, 2, 3` for error messages.
pub(crate) fn id_list(ids: &[i32]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}
