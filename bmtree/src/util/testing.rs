// src/util/testing.rs

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use tempfile::TempDir;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::repositories::sqlite::repository::SqliteTreeRepository;

static TEST_LOGGING: OnceLock<()> = OnceLock::new();

/// Initializes test logging exactly once per process.
pub fn init_test_env() {
    TEST_LOGGING.get_or_init(|| {
        setup_test_logging();
        info!("Test environment initialized");
    });
}

/// Logging setup only runs once; subsequent calls do nothing if `tracing` is already set.
fn setup_test_logging() {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["html5ever", "reqwest", "mio", "want", "hyper_util", "rustls"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Restores the `BMTREE_*` environment variables on drop.
#[derive(Debug, Clone)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

const GUARDED_VARS: [&str; 2] = ["BMTREE_DB_URL", "BMTREE_FOLDERS_FIRST"];

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            saved: GUARDED_VARS
                .iter()
                .map(|name| (*name, env::var(name).ok()))
                .collect(),
        }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(val) => env::set_var(name, val),
                None => env::remove_var(name),
            }
        }
    }
}

/// A migrated database living in its own temp directory.
///
/// The directory is removed when the value is dropped, unless `NO_CLEANUP` is set.
#[derive(Debug)]
pub struct TestDb {
    pub repo: SqliteTreeRepository,
    pub db_path: PathBuf,
    dir: Option<TempDir>,
}

impl Drop for TestDb {
    #[instrument(level = "trace", skip(self))]
    fn drop(&mut self) {
        if env::var("NO_CLEANUP").is_ok() {
            if let Some(dir) = self.dir.take() {
                info!("Test artifacts left at: {}", dir.keep().display());
            }
        }
    }
}

/// Creates a fresh repository backed by a new database file in a temp directory.
pub fn setup_test_db() -> TestDb {
    init_test_env();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("bmtree.db");
    let repo = SqliteTreeRepository::from_url(db_path.to_string_lossy().as_ref())
        .expect("Failed to create SqliteTreeRepository");
    TestDb {
        repo,
        db_path,
        dir: Some(dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn given_test_db_when_setup_then_file_exists_and_connects() {
        let db = setup_test_db();
        assert!(db.db_path.exists());
        assert!(db.repo.get_connection().is_ok());
    }

    #[test]
    #[serial]
    fn given_env_guard_when_dropped_then_variables_restored() {
        let before = env::var("BMTREE_DB_URL").ok();
        {
            let _guard = EnvGuard::new();
            env::set_var("BMTREE_DB_URL", "/tmp/elsewhere.db");
        }
        assert_eq!(env::var("BMTREE_DB_URL").ok(), before);
    }

    #[test]
    fn given_test_db_when_dropped_then_directory_removed() {
        let db = setup_test_db();
        let dir = db.db_path.parent().unwrap().to_path_buf();
        drop(db);
        if env::var("NO_CLEANUP").is_err() {
            assert!(!dir.exists());
        }
    }
}
