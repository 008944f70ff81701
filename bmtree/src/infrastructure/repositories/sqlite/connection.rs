use super::error::{SqliteRepositoryError, SqliteResult};
use crate::infrastructure::repositories::sqlite::migration::MIGRATIONS;
use chrono::Local;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::MigrationHarness;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

pub type ConnectionPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type PooledConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Milliseconds a writer waits for the database lock before failing with SQLITE_BUSY.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Per-connection settings: SQLite leaves foreign keys off unless asked on every connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            BUSY_TIMEOUT_MS
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// Initialize a connection pool
pub fn init_pool(database_url: &str) -> SqliteResult<ConnectionPool> {
    debug!("Initializing connection pool for: {}", database_url);

    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(SqliteRepositoryError::IoError)?;
        }
    }

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(8)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(|e| SqliteRepositoryError::ConnectionPoolError(e.to_string()))?;

    run_pending_migrations(&pool, database_url)?;

    info!("Connection pool initialized successfully");
    Ok(pool)
}

/// A database is worth a backup once it holds at least one bookmark or non-root folder.
fn is_database_empty_for_backup(conn: &mut SqliteConnection) -> SqliteResult<bool> {
    use diesel::prelude::*;
    use diesel::sql_types::BigInt;

    #[derive(QueryableByName, Debug)]
    struct RowCount {
        #[diesel(sql_type = BigInt)]
        count: i64,
    }

    let result: Result<RowCount, diesel::result::Error> = diesel::sql_query(
        "SELECT (SELECT COUNT(*) FROM bookmarks) + (SELECT COUNT(*) FROM folders WHERE folder_id <> 0) AS count",
    )
    .get_result::<RowCount>(conn);

    match result {
        Ok(row_count) => {
            debug!("Database contains {} user records", row_count.count);
            Ok(row_count.count == 0)
        }
        Err(e) => {
            // tables not there yet: nothing to lose
            debug!("Record count query failed: {}", e);
            Ok(true)
        }
    }
}

/// Run any pending database migrations, backing up a populated database first
#[instrument(level = "info", skip(pool))]
pub fn run_pending_migrations(pool: &ConnectionPool, database_url: &str) -> SqliteResult<()> {
    let mut conn = pool
        .get()
        .map_err(|e| SqliteRepositoryError::ConnectionPoolError(e.to_string()))?;

    let pending = conn.pending_migrations(MIGRATIONS).map_err(|e| {
        SqliteRepositoryError::MigrationError(format!("Failed to check pending migrations: {}", e))
    })?;

    if pending.is_empty() {
        debug!("No pending migrations to run");
        return Ok(());
    }

    for migration in &pending {
        info!("Pending migration: {}", migration.name());
    }

    let db_path = Path::new(database_url);
    if db_path.exists() && !is_database_empty_for_backup(&mut conn)? {
        let backup_path = backup_path_for(db_path)?;
        fs::copy(db_path, &backup_path).map_err(|e| {
            SqliteRepositoryError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to create backup: {}", e),
            ))
        })?;
        eprintln!("Backup created at: {}", backup_path.display());
    } else {
        debug!("Skipping backup, no user data in {}", database_url);
    }

    conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
        SqliteRepositoryError::MigrationError(format!("Failed to run migrations: {}", e))
    })?;

    info!("Migrations completed successfully");
    Ok(())
}

/// `tree.db` -> `tree_backup_20250302.db`
fn backup_path_for(db_path: &Path) -> SqliteResult<std::path::PathBuf> {
    let date_suffix = Local::now().format("%Y%m%d").to_string();
    let file_name = db_path.file_name().ok_or_else(|| {
        SqliteRepositoryError::OperationFailed(
            "Could not determine database filename for backup".to_string(),
        )
    })?;

    let file_name_str = file_name.to_string_lossy();
    let backup_name = match file_name_str.rfind('.') {
        Some(ext_pos) => {
            let (name, ext) = file_name_str.split_at(ext_pos);
            format!("{}_backup_{}{}", name, date_suffix, ext)
        }
        None => format!("{}_backup_{}", file_name_str, date_suffix),
    };

    Ok(db_path.with_file_name(backup_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_db_file_with_extension_when_backup_path_then_suffix_before_extension() {
        let path = backup_path_for(Path::new("/tmp/x/tree.db")).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("tree_backup_"));
        assert!(name.ends_with(".db"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/x")));
    }

    #[test]
    fn given_db_file_without_extension_when_backup_path_then_suffix_appended() {
        let path = backup_path_for(Path::new("tree")).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("tree_backup_"));
        assert!(!name.contains('.'));
    }
}
