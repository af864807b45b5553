use sea_orm_migration::prelude::*;

use cinelog_catalog_schema::constraints::{
    FK_WATCHLIST_FILMS_FILM, FK_WATCHLIST_FILMS_WATCHLIST, FK_WATCHLISTS_USER,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Watchlists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Watchlists::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Watchlists::UserId).uuid().not_null())
                    .col(ColumnDef::new(Watchlists::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Watchlists::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Watchlists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Watchlists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_WATCHLISTS_USER)
                            .from(Watchlists::Table, Watchlists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Watchlist names are unique per owner.
        manager
            .create_index(
                Index::create()
                    .table(Watchlists::Table)
                    .col(Watchlists::UserId)
                    .col(Watchlists::Name)
                    .name("uq_watchlists_user_id_name")
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WatchlistFilms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WatchlistFilms::WatchlistId).uuid().not_null())
                    .col(ColumnDef::new(WatchlistFilms::FilmId).uuid().not_null())
                    .col(
                        ColumnDef::new(WatchlistFilms::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(WatchlistFilms::WatchlistId)
                            .col(WatchlistFilms::FilmId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_WATCHLIST_FILMS_WATCHLIST)
                            .from(WatchlistFilms::Table, WatchlistFilms::WatchlistId)
                            .to(Watchlists::Table, Watchlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_WATCHLIST_FILMS_FILM)
                            .from(WatchlistFilms::Table, WatchlistFilms::FilmId)
                            .to(Films::Table, Films::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WatchlistFilms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Watchlists::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Watchlists {
    Table,
    Id,
    UserId,
    Name,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WatchlistFilms {
    Table,
    WatchlistId,
    FilmId,
    AddedAt,
}

#[derive(Iden)]
enum Films {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
