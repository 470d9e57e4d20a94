//! Create `maintenance` table: one employee servicing one train over `[from_time, to_time)`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Maintenance::Table)
                    .if_not_exists()
                    .col(pk_auto(Maintenance::Id))
                    .col(string_len(Maintenance::EmployeeSsn, 10))
                    .col(integer(Maintenance::TrainId))
                    .col(date_time(Maintenance::FromTime))
                    .col(date_time(Maintenance::ToTime))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_employee")
                            .from(Maintenance::Table, Maintenance::EmployeeSsn)
                            .to(Employee::Table, Employee::Ssn)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_train")
                            .from(Maintenance::Table, Maintenance::TrainId)
                            .to(Train::Table, Train::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Maintenance::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Maintenance {
    Table,
    Id,
    EmployeeSsn,
    TrainId,
    FromTime,
    ToTime,
}

#[derive(DeriveIden)]
enum Employee { Table, Ssn }

#[derive(DeriveIden)]
enum Train { Table, Id }
