//! Schema migrations, applied in order at startup.

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_posts_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_posts_table::Migration),
        ]
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    Email,
    ImageFile,
}

#[derive(DeriveIden)]
pub(crate) enum Posts {
    Table,
    Id,
    Title,
    Content,
    DatePosted,
    UserId,
}
