//! Create `historicos` table.
//! One row per recorded language/date/rank observation.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Historicos::Table)
                    .if_not_exists()
                    .col(pk_auto(Historicos::Id))
                    .col(string_len(Historicos::Lingua, 255))
                    .col(string_len(Historicos::Data, 255))
                    .col(string_len_null(Historicos::Rank, 255))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Historicos::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Historicos {
    Table,
    Id,
    Lingua,
    Data,
    Rank,
}
