//! Create `section` (a rail segment between two stations) and `section_warning`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Section::Table)
                    .if_not_exists()
                    .col(pk_auto(Section::Id))
                    .col(double(Section::UsageFee))
                    .col(double(Section::Length))
                    .col(integer(Section::MaxSpeed))
                    .col(string_len(Section::TrackGauge, 8))
                    .col(integer(Section::StartStationId))
                    .col(integer(Section::EndStationId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_section_start_station")
                            .from(Section::Table, Section::StartStationId)
                            .to(TrainStation::Table, TrainStation::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_section_end_station")
                            .from(Section::Table, Section::EndStationId)
                            .to(TrainStation::Table, TrainStation::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SectionWarning::Table)
                    .if_not_exists()
                    .col(integer(SectionWarning::SectionId))
                    .col(integer(SectionWarning::WarningId))
                    .primary_key(
                        Index::create()
                            .col(SectionWarning::SectionId)
                            .col(SectionWarning::WarningId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_section_warning_section")
                            .from(SectionWarning::Table, SectionWarning::SectionId)
                            .to(Section::Table, Section::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_section_warning_warning")
                            .from(SectionWarning::Table, SectionWarning::WarningId)
                            .to(Warning::Table, Warning::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SectionWarning::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Section::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Section {
    Table,
    Id,
    UsageFee,
    Length,
    MaxSpeed,
    TrackGauge,
    StartStationId,
    EndStationId,
}

#[derive(DeriveIden)]
enum SectionWarning {
    Table,
    SectionId,
    WarningId,
}

#[derive(DeriveIden)]
enum TrainStation { Table, Id }

#[derive(DeriveIden)]
enum Warning { Table, Id }
