//! Business-rule validators, free of HTTP and database concerns.
//!
//! Callers load the relevant rows, map them to the small input structs below and
//! convert a failure into `ServiceError` via `?`.

pub mod composition;
pub mod connectivity;
pub mod overlap;

use models::enums::TrackGauge;
use thiserror::Error;

pub use composition::{validate_composition, PassengerCarSpec, RailcarSpec};
pub use connectivity::{order_sections, SectionLink};
pub use overlap::{find_overlap, validate_window, Window};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Track gauge mismatch")]
    GaugeMismatch { expected: TrackGauge, passenger_car_id: i32, found: TrackGauge },
    #[error("Railcar too weak")]
    RailcarTooWeak { load: i64, capacity: i64 },
    #[error("At least one passenger car is required")]
    NoPassengerCars,
    #[error("Passenger car {0} is listed more than once")]
    DuplicatePassengerCar(i32),

    #[error("The start time must be before the end time")]
    InvalidWindow,
    #[error("Employee already assigned to overlapping maintenance time")]
    MaintenanceOverlap { existing_id: i32 },

    #[error("At least one section is required")]
    EmptyTrack,
    #[error("Section {0} is listed more than once")]
    DuplicateSection(i32),
    #[error("Sections with IDs {} not found", join_ids(.0))]
    MissingSections(Vec<i32>),
    #[error("All sections of a track must share one track gauge")]
    SectionGaugeMismatch,
    #[error("Track must have exactly one start and one end station")]
    NoUniqueStart,
    #[error("Sections do not form a single connected path")]
    DisconnectedChain,

    #[error("endDate must not be before startDate")]
    InvalidDateRange,
    #[error("weekdays are required when endDate is set")]
    MissingWeekdays,
    #[error("weekday {0} is out of range (1 = Monday ... 7 = Sunday)")]
    InvalidWeekday(u8),
    #[error("endTime must not be before startTime")]
    InvalidTimeRange,
    #[error("intervalMinutes must be greater than 0 when endTime is set")]
    InvalidInterval,
    #[error("schedule expands to more than {0} rides")]
    TooManySlots(usize),
    #[error("schedule does not match any date")]
    EmptySchedule,
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}
