use std::time::Duration;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Stands in for "never" where the pool only accepts a finite duration.
const FOREVER: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn connect_options(url: &str) -> ConnectOptions {
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging_level(log::LevelFilter::Debug);
    if url.contains(":memory:") {
        // the database lives and dies with its single connection
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(FOREVER)
            .max_lifetime(FOREVER);
    }
    options
}

pub async fn connect(url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(connect_options(url))
        .await
        .context("failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to migrate database")?;
    Ok(db)
}

/// Fresh, migrated in-memory SQLite database.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    connect("sqlite::memory:").await
}
