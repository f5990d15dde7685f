pub use sea_orm_migration::prelude::*;

mod m20251101_000001_create_participants;
mod m20251101_000002_create_draw_results;
mod m20251101_000003_create_seed_versions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_create_participants::Migration),
            Box::new(m20251101_000002_create_draw_results::Migration),
            Box::new(m20251101_000003_create_seed_versions::Migration),
        ]
    }
}
