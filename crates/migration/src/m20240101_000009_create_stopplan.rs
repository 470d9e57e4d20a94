//! Create `stopplan` and its ordered `stopplan_station` list.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stopplan::Table)
                    .if_not_exists()
                    .col(pk_auto(Stopplan::Id))
                    .col(string_len(Stopplan::Name, 128))
                    .col(double(Stopplan::MinPrice))
                    .col(integer(Stopplan::TrackId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stopplan_track")
                            .from(Stopplan::Table, Stopplan::TrackId)
                            .to(Track::Table, Track::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StopplanStation::Table)
                    .if_not_exists()
                    .col(integer(StopplanStation::StopplanId))
                    .col(integer(StopplanStation::TrainStationId))
                    .col(integer(StopplanStation::Position))
                    .primary_key(
                        Index::create()
                            .col(StopplanStation::StopplanId)
                            .col(StopplanStation::TrainStationId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stopplan_station_stopplan")
                            .from(StopplanStation::Table, StopplanStation::StopplanId)
                            .to(Stopplan::Table, Stopplan::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stopplan_station_station")
                            .from(StopplanStation::Table, StopplanStation::TrainStationId)
                            .to(TrainStation::Table, TrainStation::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StopplanStation::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Stopplan::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Stopplan {
    Table,
    Id,
    Name,
    MinPrice,
    TrackId,
}

#[derive(DeriveIden)]
enum StopplanStation {
    Table,
    StopplanId,
    TrainStationId,
    Position,
}

#[derive(DeriveIden)]
enum Track { Table, Id }

#[derive(DeriveIden)]
enum TrainStation { Table, Id }
