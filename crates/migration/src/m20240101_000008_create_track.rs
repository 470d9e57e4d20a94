//! Create `track` and `track_section`; `position` stores the path order.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Track::Table)
                    .if_not_exists()
                    .col(pk_auto(Track::Id))
                    .col(string_len(Track::TrackName, 128))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TrackSection::Table)
                    .if_not_exists()
                    .col(integer(TrackSection::TrackId))
                    .col(integer(TrackSection::SectionId))
                    .col(integer(TrackSection::Position))
                    .primary_key(
                        Index::create()
                            .col(TrackSection::TrackId)
                            .col(TrackSection::SectionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_track_section_track")
                            .from(TrackSection::Table, TrackSection::TrackId)
                            .to(Track::Table, Track::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_track_section_section")
                            .from(TrackSection::Table, TrackSection::SectionId)
                            .to(Section::Table, Section::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TrackSection::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Track::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Track {
    Table,
    Id,
    TrackName,
}

#[derive(DeriveIden)]
enum TrackSection {
    Table,
    TrackId,
    SectionId,
    Position,
}

#[derive(DeriveIden)]
enum Section { Table, Id }
