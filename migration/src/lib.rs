pub use sea_orm_migration::prelude::*;

mod m20260901_000001_initial;
mod m20260901_000002_add_paid_features;
mod m20260915_000001_add_notifications;
mod m20261016_000001_unique_open_purchases;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_initial::Migration),
            Box::new(m20260901_000002_add_paid_features::Migration),
            Box::new(m20260915_000001_add_notifications::Migration),
            Box::new(m20261016_000001_unique_open_purchases::Migration),
        ]
    }
}
