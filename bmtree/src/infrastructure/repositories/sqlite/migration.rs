// src/infrastructure/repositories/sqlite/migration.rs
use crate::infrastructure::repositories::sqlite::error::{SqliteRepositoryError, SqliteResult};
use diesel::sqlite::Sqlite;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, instrument};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Rebuilds the tree schema from scratch, leaving only the root folder.
#[instrument(skip_all, level = "debug")]
pub fn init_db(conn: &mut impl MigrationHarness<Sqlite>) -> SqliteResult<()> {
    let reverted = conn
        .revert_all_migrations(MIGRATIONS)
        .map_err(|e| SqliteRepositoryError::MigrationError(format!("revert: {}", e)))?
        .len();
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| SqliteRepositoryError::MigrationError(format!("apply: {}", e)))?
        .len();
    debug!(
        reverted = reverted,
        applied = applied,
        "tree schema rebuilt"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::ListingOrder;
    use crate::domain::folder::ROOT_FOLDER_ID;
    use crate::domain::repositories::repository::TreeRepository;
    use crate::util::testing::setup_test_db;

    #[test]
    fn given_populated_tree_when_init_db_then_root_only() {
        let db = setup_test_db();
        let a = db.repo.create_folder(ROOT_FOLDER_ID, "a").unwrap();
        db.repo.create_bookmark(a, "bm", "http://bm", None).unwrap();

        {
            let mut conn = db.repo.get_connection().unwrap();
            init_db(&mut conn).unwrap();
            assert!(conn.pending_migrations(MIGRATIONS).unwrap().is_empty());
        }

        assert!(db.repo.list("/", ListingOrder::Interleaved).unwrap().is_empty());
        assert_eq!(db.repo.resolve("/").unwrap().id, ROOT_FOLDER_ID);
    }
}
