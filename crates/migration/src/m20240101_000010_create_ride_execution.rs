//! Create `ride_execution` (one scheduled run) and its crew link table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RideExecution::Table)
                    .if_not_exists()
                    .col(pk_auto(RideExecution::Id))
                    .col(double(RideExecution::Price))
                    .col(boolean(RideExecution::IsCanceled).default(false))
                    .col(integer(RideExecution::Delay).default(0))
                    .col(date(RideExecution::Date))
                    .col(time(RideExecution::Time))
                    .col(integer(RideExecution::StopplanId))
                    .col(integer(RideExecution::TrainId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ride_execution_stopplan")
                            .from(RideExecution::Table, RideExecution::StopplanId)
                            .to(Stopplan::Table, Stopplan::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ride_execution_train")
                            .from(RideExecution::Table, RideExecution::TrainId)
                            .to(Train::Table, Train::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RideExecutionEmployee::Table)
                    .if_not_exists()
                    .col(integer(RideExecutionEmployee::RideExecutionId))
                    .col(string_len(RideExecutionEmployee::EmployeeSsn, 10))
                    .primary_key(
                        Index::create()
                            .col(RideExecutionEmployee::RideExecutionId)
                            .col(RideExecutionEmployee::EmployeeSsn),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ride_execution_employee_ride")
                            .from(RideExecutionEmployee::Table, RideExecutionEmployee::RideExecutionId)
                            .to(RideExecution::Table, RideExecution::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ride_execution_employee_employee")
                            .from(RideExecutionEmployee::Table, RideExecutionEmployee::EmployeeSsn)
                            .to(Employee::Table, Employee::Ssn)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RideExecutionEmployee::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(RideExecution::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RideExecution {
    Table,
    Id,
    Price,
    IsCanceled,
    Delay,
    Date,
    Time,
    StopplanId,
    TrainId,
}

#[derive(DeriveIden)]
enum RideExecutionEmployee {
    Table,
    RideExecutionId,
    EmployeeSsn,
}

#[derive(DeriveIden)]
enum Stopplan { Table, Id }

#[derive(DeriveIden)]
enum Train { Table, Id }

#[derive(DeriveIden)]
enum Employee { Table, Ssn }
