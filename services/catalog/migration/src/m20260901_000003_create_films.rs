use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Films::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Films::Title).string().not_null())
                    .col(ColumnDef::new(Films::Genre).string().not_null())
                    .col(ColumnDef::new(Films::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Films::Rating).double())
                    .col(
                        ColumnDef::new(Films::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Films::Table)
                    .col(Films::CreatedAt)
                    .name("idx_films_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Films::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Films {
    Table,
    Id,
    Title,
    Genre,
    ReleaseDate,
    Rating,
    CreatedAt,
}
