//! Create `employee` table.
//! The ssn doubles as primary key; usernames are unique login handles.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(string_len(Employee::Ssn, 10).primary_key())
                    .col(string_len(Employee::FirstName, 128))
                    .col(string_len(Employee::LastName, 128))
                    .col(string_len(Employee::Username, 128).unique_key())
                    .col(string_len(Employee::PasswordHash, 255))
                    .col(string_len(Employee::Department, 16))
                    .col(string_len(Employee::Role, 16))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Employee::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Employee {
    Table,
    Ssn,
    FirstName,
    LastName,
    Username,
    PasswordHash,
    Department,
    Role,
}
