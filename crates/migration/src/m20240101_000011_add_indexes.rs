use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Maintenance: overlap scans are per employee, delete guards per train
        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_employee")
                    .table(Maintenance::Table)
                    .col(Maintenance::EmployeeSsn)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_train")
                    .table(Maintenance::Table)
                    .col(Maintenance::TrainId)
                    .to_owned(),
            )
            .await?;

        // Carriage assignment guard
        manager
            .create_index(
                Index::create()
                    .name("idx_train_passenger_car_car")
                    .table(TrainPassengerCar::Table)
                    .col(TrainPassengerCar::PassengerCarId)
                    .to_owned(),
            )
            .await?;

        // Station usage guard
        manager
            .create_index(
                Index::create()
                    .name("idx_section_start_station")
                    .table(Section::Table)
                    .col(Section::StartStationId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_section_end_station")
                    .table(Section::Table)
                    .col(Section::EndStationId)
                    .to_owned(),
            )
            .await?;

        // Double-booking lookups (train, date, time)
        manager
            .create_index(
                Index::create()
                    .name("idx_ride_execution_train_slot")
                    .table(RideExecution::Table)
                    .col(RideExecution::TrainId)
                    .col(RideExecution::Date)
                    .col(RideExecution::Time)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_ride_execution_train_slot").table(RideExecution::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_section_end_station").table(Section::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_section_start_station").table(Section::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_train_passenger_car_car").table(TrainPassengerCar::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_maintenance_train").table(Maintenance::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_maintenance_employee").table(Maintenance::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Maintenance { Table, EmployeeSsn, TrainId }

#[derive(DeriveIden)]
enum TrainPassengerCar { Table, PassengerCarId }

#[derive(DeriveIden)]
enum Section { Table, StartStationId, EndStationId }

#[derive(DeriveIden)]
enum RideExecution { Table, TrainId, Date, Time }
