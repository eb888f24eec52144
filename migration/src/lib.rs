pub use sea_orm_migration::prelude::*;

mod m20260105_000001_directory;
mod m20260105_000002_calendar;
mod m20260105_000003_licensed_states_seed;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_directory::Migration),
            Box::new(m20260105_000002_calendar::Migration),
            Box::new(m20260105_000003_licensed_states_seed::Migration),
        ]
    }
}
