use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::tree_service::TreeService;
use crate::application::TreeServiceImpl;
use crate::config::Settings;
use crate::domain::services::metadata::MetadataFetcher;
use crate::infrastructure::http::HttpMetadataFetcher;
use crate::infrastructure::repositories::sqlite::repository::SqliteTreeRepository;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Production service container, the single place where services are wired
pub struct ServiceContainer {
    pub tree_repository: Arc<SqliteTreeRepository>,
    pub metadata_fetcher: Arc<dyn MetadataFetcher>,
    pub tree_service: Arc<dyn TreeService>,
}

impl ServiceContainer {
    /// Create all services for the configured database, which has to exist
    pub fn new(config: &Settings) -> ApplicationResult<Self> {
        let tree_repository = Self::create_repository(&config.db_url)?;
        let metadata_fetcher: Arc<dyn MetadataFetcher> =
            Arc::new(HttpMetadataFetcher::new(config.fetch_timeout_ms));
        Ok(Self::with_parts(tree_repository, metadata_fetcher))
    }

    /// Wire the services around an existing repository and fetcher
    pub fn with_parts(
        tree_repository: Arc<SqliteTreeRepository>,
        metadata_fetcher: Arc<dyn MetadataFetcher>,
    ) -> Self {
        let tree_service = Arc::new(TreeServiceImpl::new(
            tree_repository.clone(),
            metadata_fetcher.clone(),
        ));
        Self {
            tree_repository,
            metadata_fetcher,
            tree_service,
        }
    }

    fn create_repository(db_url: &str) -> ApplicationResult<Arc<SqliteTreeRepository>> {
        if !Path::new(db_url).exists() {
            return Err(ApplicationError::Other(format!(
                "Database not found at '{}'. Create one with 'bmtree create-db <path>' \
                 and point BMTREE_DB_URL or db_url in the config file to it",
                db_url
            )));
        }

        debug!("Opening database {}", db_url);
        // runs pending migrations
        let repository = SqliteTreeRepository::from_url(db_url).map_err(|e| {
            ApplicationError::Other(format!("Failed to open SQLite tree repository: {}", e))
        })?;

        Ok(Arc::new(repository))
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("tree_repository", &self.tree_repository)
            .field("metadata_fetcher", &self.metadata_fetcher)
            .field("tree_service", &"Arc<dyn TreeService>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::repository::TreeRepository;
    use crate::util::testing::setup_test_db;

    #[test]
    fn given_missing_database_when_container_created_then_error() {
        let settings = Settings {
            db_url: "/nonexistent/dir/bmtree.db".to_string(),
            ..Settings::default()
        };
        let err = ServiceContainer::new(&settings).unwrap_err();
        assert!(err.to_string().contains("create-db"));
    }

    #[test]
    fn given_existing_database_when_container_created_then_services_share_it() {
        let db = setup_test_db();
        let settings = Settings {
            db_url: db.db_path.to_string_lossy().to_string(),
            ..Settings::default()
        };

        let container = ServiceContainer::new(&settings).unwrap();
        let folder = container.tree_service.create_folder_at("/", "a").unwrap();

        assert_eq!(db.repo.resolve("/a").unwrap().id, folder.id);
    }
}
