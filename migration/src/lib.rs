pub use sea_orm_migration::prelude::*;

mod util;
mod m20260823_000001_init;
mod m20260824_000002_seed_demo_org;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260823_000001_init::Migration),
            Box::new(m20260824_000002_seed_demo_org::Migration),
        ]
    }
}
