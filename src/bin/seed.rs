//! Loads an officer roster into the database.
//!
//! Usage: `seed <roster.json>` where the file holds an array of
//! `{name, email, password, phone, badgeNumber, station, status?, deviceToken?}`.

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use vanrakshak_server::{
    migrator,
    roster::{register_officer, NewOfficer},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    vanrakshak_server::telemetry::init_telemetry("vanrakshak-seed")?;

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: seed <roster.json>")?;
    let roster: Vec<NewOfficer> = serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?;

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let db = Database::connect(&database_url).await?;
    migrator::Migrator::up(&db, None).await?;

    let mut registered = 0usize;
    for officer in roster {
        let badge = officer.badge_number.clone();
        match register_officer(&db, officer).await {
            Ok(_) => registered += 1,
            Err(e) => tracing::warn!(badge = %badge, "skipping officer: {}", e),
        }
    }

    tracing::info!("Seeded {} officers from {}", registered, path);
    Ok(())
}
