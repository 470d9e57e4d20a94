use chrono::NaiveDateTime;

use super::ValidationError;

/// Half-open time window `[from, to)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

/// Reject windows that are empty or inverted.
pub fn validate_window(from: NaiveDateTime, to: NaiveDateTime) -> Result<Window, ValidationError> {
    Window::new(from, to)
}

impl Window {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self, ValidationError> {
        if from >= to {
            return Err(ValidationError::InvalidWindow);
        }
        Ok(Self { from, to })
    }

    pub fn overlaps(&self, other: &Window) -> bool {
        other.from < self.to && other.to > self.from
    }
}

/// Reject `candidate` when it overlaps any `(id, window)` in `existing`,
/// ignoring the record with id `exclude_id`.
pub fn find_overlap<I>(candidate: &Window, existing: I, exclude_id: Option<i32>) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = (i32, Window)>,
{
    match existing
        .into_iter()
        .filter(|(id, _)| Some(*id) != exclude_id)
        .find(|(_, w)| candidate.overlaps(w))
    {
        Some((existing_id, _)) => Err(ValidationError::MaintenanceOverlap { existing_id }),
        None => Ok(()),
    }
}
