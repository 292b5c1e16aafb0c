use sea_orm_migration::prelude::*;

mod m20260301_000001_create_officers;
mod m20260301_000002_create_incidents;
mod m20260301_000003_create_patrols;
mod m20260301_000004_create_sos_alerts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_officers::Migration),
            Box::new(m20260301_000002_create_incidents::Migration),
            Box::new(m20260301_000003_create_patrols::Migration),
            Box::new(m20260301_000004_create_sos_alerts::Migration),
        ]
    }
}
