//! Create `warning` table. `end_date` is open-ended when null.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warning::Table)
                    .if_not_exists()
                    .col(pk_auto(Warning::Id))
                    .col(string_len(Warning::WarningName, 128).unique_key())
                    .col(text(Warning::Description))
                    .col(date_time(Warning::StartDate))
                    .col(date_time_null(Warning::EndDate))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Warning::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Warning {
    Table,
    Id,
    WarningName,
    Description,
    StartDate,
    EndDate,
}
