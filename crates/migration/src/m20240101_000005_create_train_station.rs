//! Create `train_station` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrainStation::Table)
                    .if_not_exists()
                    .col(pk_auto(TrainStation::Id))
                    .col(string_len(TrainStation::StationName, 128).unique_key())
                    .col(string_len(TrainStation::Address, 256))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TrainStation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TrainStation {
    Table,
    Id,
    StationName,
    Address,
}
