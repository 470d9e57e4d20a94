//! Create `train` and its ordered `train_passenger_car` association.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Train::Table)
                    .if_not_exists()
                    .col(pk_auto(Train::Id))
                    .col(string_len(Train::Name, 128))
                    // a railcar pulls at most one train
                    .col(integer(Train::RailcarId).unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_train_railcar")
                            .from(Train::Table, Train::RailcarId)
                            .to(Carriage::Table, Carriage::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TrainPassengerCar::Table)
                    .if_not_exists()
                    .col(integer(TrainPassengerCar::TrainId))
                    .col(integer(TrainPassengerCar::PassengerCarId))
                    .col(integer(TrainPassengerCar::Position))
                    .primary_key(
                        Index::create()
                            .col(TrainPassengerCar::TrainId)
                            .col(TrainPassengerCar::PassengerCarId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_train_passenger_car_train")
                            .from(TrainPassengerCar::Table, TrainPassengerCar::TrainId)
                            .to(Train::Table, Train::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_train_passenger_car_carriage")
                            .from(TrainPassengerCar::Table, TrainPassengerCar::PassengerCarId)
                            .to(Carriage::Table, Carriage::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TrainPassengerCar::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Train::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Train {
    Table,
    Id,
    Name,
    RailcarId,
}

#[derive(DeriveIden)]
enum TrainPassengerCar {
    Table,
    TrainId,
    PassengerCarId,
    Position,
}

#[derive(DeriveIden)]
enum Carriage { Table, Id }
