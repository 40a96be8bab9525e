//! Migrations, run at startup and idempotent when already applied (§6.3).

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_users;
mod m20260101_000002_create_pages;
mod m20260101_000003_create_pages_closures;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_pages::Migration),
            Box::new(m20260101_000003_create_pages_closures::Migration),
        ]
    }
}
