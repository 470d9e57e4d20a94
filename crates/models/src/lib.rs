//! SeaORM entities for the fleet, track and schedule tables, plus field-level validation.

pub mod errors;
pub mod db;
pub mod enums;

// fleet
pub mod employee;
pub mod carriage;
pub mod train;
pub mod train_passenger_car;
pub mod maintenance;

// track
pub mod train_station;
pub mod section;
pub mod section_warning;
pub mod warning;
pub mod track;
pub mod track_section;

// schedule
pub mod stopplan;
pub mod stopplan_station;
pub mod ride_execution;
pub mod ride_execution_employee;
