/// Database migration runner
///
/// Thin wrapper around sqlx's embedded migration system. Migration files live
/// in the `migrations/` directory of this crate and are compiled into the
/// binary, so deployments never depend on loose SQL files being present.
///
/// Both the API server and the reminder worker call [`run_migrations`] on
/// startup; sqlx serializes concurrent runs with an advisory lock, so the
/// first process to boot applies the schema and the rest fall through.

use sqlx::migrate::MigrateDatabase;
use sqlx::postgres::PgPool;
use sqlx::Postgres;
use tracing::{debug, info, warn};

/// Summary of applied migrations, reported by tooling and tests
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of successfully applied migrations
    pub applied_migrations: usize,

    /// Latest applied migration version (timestamp prefix)
    pub latest_version: Option<i64>,
}

/// Runs all pending migrations from the embedded `migrations/` directory
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a statement fails, or
/// the connection is lost mid-run. Failed migrations are rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("./migrations");

    info!(embedded = migrator.iter().count(), "Running database migrations");

    migrator.run(pool).await?;

    info!("Database migrations up to date");
    Ok(())
}

/// Reads how many migrations have been applied and the latest version
///
/// # Errors
///
/// Returns an error if the `_sqlx_migrations` bookkeeping table cannot be
/// queried.
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    // to_regclass is NULL when the bookkeeping table has never been created
    let table_exists: bool =
        sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;

    if !table_exists {
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version)
         FROM _sqlx_migrations
         WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
    })
}

/// Creates the database if it does not exist. Development convenience; in
/// production the database is provisioned ahead of time.
///
/// # Errors
///
/// Returns an error if the server is unreachable or the role lacks CREATEDB.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
        return Ok(());
    }

    info!("Database does not exist, creating it");
    Postgres::create_database(database_url).await
}

/// Drops the database. Test harness only; never call this against a
/// production URL.
///
/// # Errors
///
/// Returns an error if the server is unreachable or the database is in use.
pub async fn drop_database(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        return Ok(());
    }

    warn!("Dropping database: {}", database_url);
    Postgres::drop_database(database_url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_status_is_cloneable() {
        let status = MigrationStatus {
            applied_migrations: 2,
            latest_version: Some(20250110000001),
        };

        let cloned = status.clone();
        assert_eq!(cloned.applied_migrations, 2);
        assert_eq!(cloned.latest_version, Some(20250110000001));
    }

    // Runner tests live in tests/db_migrations_tests.rs and need a database.
}
