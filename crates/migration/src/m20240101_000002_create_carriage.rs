//! Create `carriage` table.
//! Railcars and passenger cars share one table; subtype columns are nullable.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Carriage::Table)
                    .if_not_exists()
                    .col(pk_auto(Carriage::Id))
                    .col(string_len(Carriage::TrackGauge, 8))
                    .col(string_len(Carriage::CarriageType, 16))
                    .col(integer_null(Carriage::MaxTractiveForce))
                    .col(integer_null(Carriage::NumberOfSeats))
                    .col(integer_null(Carriage::MaxWeight))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Carriage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Carriage {
    Table,
    Id,
    TrackGauge,
    CarriageType,
    MaxTractiveForce,
    NumberOfSeats,
    MaxWeight,
}
