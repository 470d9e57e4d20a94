//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_employee;
mod m20240101_000002_create_carriage;
mod m20240101_000003_create_train;
mod m20240101_000004_create_maintenance;
mod m20240101_000005_create_train_station;
mod m20240101_000006_create_warning;
mod m20240101_000007_create_section;
mod m20240101_000008_create_track;
mod m20240101_000009_create_stopplan;
mod m20240101_000010_create_ride_execution;
mod m20240101_000011_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // fleet
            Box::new(m20240101_000001_create_employee::Migration),
            Box::new(m20240101_000002_create_carriage::Migration),
            Box::new(m20240101_000003_create_train::Migration),
            Box::new(m20240101_000004_create_maintenance::Migration),
            // track
            Box::new(m20240101_000005_create_train_station::Migration),
            Box::new(m20240101_000006_create_warning::Migration),
            Box::new(m20240101_000007_create_section::Migration),
            Box::new(m20240101_000008_create_track::Migration),
            // schedule
            Box::new(m20240101_000009_create_stopplan::Migration),
            Box::new(m20240101_000010_create_ride_execution::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000011_add_indexes::Migration),
        ]
    }
}
