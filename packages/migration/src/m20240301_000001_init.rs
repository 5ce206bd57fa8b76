use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Persons {
    Table,
    Id,
    Guid,
    Name,
}

#[derive(Iden)]
enum Databases {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Stats {
    Table,
    Id,
    PersonId,
    DatabaseId,
    Dcount,
    Ccount,
    Hindex,
    Url,
    Creationtime,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // persons
        manager
            .create_table(
                Table::create()
                    .table(Persons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Persons::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Persons::Guid)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Persons::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // databases (the set of known data sources)
        manager
            .create_table(
                Table::create()
                    .table(Databases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Databases::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Databases::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // stats
        manager
            .create_table(
                Table::create()
                    .table(Stats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stats::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Stats::PersonId).big_integer().not_null())
                    .col(ColumnDef::new(Stats::DatabaseId).big_integer().not_null())
                    .col(ColumnDef::new(Stats::Dcount).integer().not_null())
                    .col(ColumnDef::new(Stats::Ccount).integer().not_null())
                    .col(ColumnDef::new(Stats::Hindex).integer().not_null())
                    .col(ColumnDef::new(Stats::Url).string().not_null())
                    .col(
                        ColumnDef::new(Stats::Creationtime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stats_person_id")
                            .from(Stats::Table, Stats::PersonId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stats_database_id")
                            .from(Stats::Table, Stats::DatabaseId)
                            .to(Databases::Table, Databases::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one stats row per (person, database)
        manager
            .create_index(
                Index::create()
                    .name("person_database_unique_constraint")
                    .table(Stats::Table)
                    .col(Stats::PersonId)
                    .col(Stats::DatabaseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_stats_database_id")
                    .table(Stats::Table)
                    .col(Stats::DatabaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ix_stats_database_id")
                    .table(Stats::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("person_database_unique_constraint")
                    .table(Stats::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Stats::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Databases::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Persons::Table).to_owned())
            .await?;

        Ok(())
    }
}
