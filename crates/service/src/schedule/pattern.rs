use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike};
use serde::Deserialize;

use crate::validation::ValidationError;

/// Upper bound on rides produced by one pattern.
pub const MAX_SLOTS: usize = 5000;

/// When rides happen: a date (or weekday-filtered date range) crossed with a
/// time (or fixed-interval time range). Both ranges are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePattern {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(deserialize_with = "common::datetime::time::deserialize")]
    pub start_time: NaiveTime,
    #[serde(default, deserialize_with = "common::datetime::time::option::deserialize")]
    pub end_time: Option<NaiveTime>,
    /// ISO weekday numbers, 1 = Monday.
    #[serde(default)]
    pub weekdays: Vec<u8>,
    #[serde(default)]
    pub interval_minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl SchedulePattern {
    fn times(&self) -> Result<Vec<NaiveTime>, ValidationError> {
        let Some(end) = self.end_time else {
            return Ok(vec![self.start_time]);
        };
        if end < self.start_time {
            return Err(ValidationError::InvalidTimeRange);
        }
        let step = match self.interval_minutes {
            Some(m) if m > 0 => i64::from(m) * 60,
            _ => return Err(ValidationError::InvalidInterval),
        };
        // seconds since midnight, so the walk never wraps past 23:59
        let from = i64::from(self.start_time.num_seconds_from_midnight());
        let to = i64::from(end.num_seconds_from_midnight());
        let mut out = Vec::new();
        let mut t = from;
        while t <= to {
            if let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(t as u32, 0) {
                out.push(time);
            }
            t += step;
        }
        Ok(out)
    }

    /// All slots in ascending order.
    pub fn expand(&self) -> Result<Vec<Slot>, ValidationError> {
        let times = self.times()?;
        let dates = match self.end_date {
            None => vec![self.start_date],
            Some(end) => self.dates_until(end, times.len())?,
        };

        let total = dates.len() * times.len();
        if total > MAX_SLOTS {
            return Err(ValidationError::TooManySlots(MAX_SLOTS));
        }
        if total == 0 {
            return Err(ValidationError::EmptySchedule);
        }
        Ok(dates
            .iter()
            .flat_map(|&date| times.iter().map(move |&time| Slot { date, time }))
            .collect())
    }

    fn dates_until(&self, end: NaiveDate, per_day: usize) -> Result<Vec<NaiveDate>, ValidationError> {
        if end < self.start_date {
            return Err(ValidationError::InvalidDateRange);
        }
        if self.weekdays.is_empty() {
            return Err(ValidationError::MissingWeekdays);
        }
        if let Some(bad) = self.weekdays.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(ValidationError::InvalidWeekday(*bad));
        }
        let wanted: BTreeSet<u32> = self.weekdays.iter().map(|d| u32::from(*d)).collect();

        let mut out = Vec::new();
        let mut day = self.start_date;
        while day <= end {
            if wanted.contains(&day.weekday().number_from_monday()) {
                out.push(day);
                if out.len() * per_day.max(1) > MAX_SLOTS {
                    return Err(ValidationError::TooManySlots(MAX_SLOTS));
                }
            }
            match day.checked_add_days(Days::new(1)) {
                Some(next) => day = next,
                None => break,
            }
        }
        Ok(out)
    }
}
