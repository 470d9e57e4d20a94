use std::collections::HashSet;

use models::enums::TrackGauge;

use super::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RailcarSpec {
    pub id: i32,
    pub track_gauge: TrackGauge,
    pub max_tractive_force: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassengerCarSpec {
    pub id: i32,
    pub track_gauge: TrackGauge,
    pub max_weight: i32,
}

/// Check that `railcar` can pull `cars`: one shared gauge and a total load
/// no greater than the tractive force. Returns the total load.
pub fn validate_composition(railcar: &RailcarSpec, cars: &[PassengerCarSpec]) -> Result<i64, ValidationError> {
    if cars.is_empty() {
        return Err(ValidationError::NoPassengerCars);
    }
    let mut seen = HashSet::with_capacity(cars.len());
    for car in cars {
        if !seen.insert(car.id) {
            return Err(ValidationError::DuplicatePassengerCar(car.id));
        }
    }
    if let Some(car) = cars.iter().find(|c| c.track_gauge != railcar.track_gauge) {
        return Err(ValidationError::GaugeMismatch {
            expected: railcar.track_gauge,
            passenger_car_id: car.id,
            found: car.track_gauge,
        });
    }

    let load: i64 = cars.iter().map(|c| i64::from(c.max_weight)).sum();
    let capacity = i64::from(railcar.max_tractive_force);
    if load > capacity {
        return Err(ValidationError::RailcarTooWeak { load, capacity });
    }
    Ok(load)
}
