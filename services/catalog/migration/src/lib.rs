use sea_orm_migration::prelude::*;

mod m20260901_000001_create_users;
mod m20260901_000002_create_one_time_codes;
mod m20260901_000003_create_films;
mod m20260901_000004_create_reviews;
mod m20260901_000005_create_watchlists;
mod m20260901_000006_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_users::Migration),
            Box::new(m20260901_000002_create_one_time_codes::Migration),
            Box::new(m20260901_000003_create_films::Migration),
            Box::new(m20260901_000004_create_reviews::Migration),
            Box::new(m20260901_000005_create_watchlists::Migration),
            Box::new(m20260901_000006_create_outbox_events::Migration),
        ]
    }
}
