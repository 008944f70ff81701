// bmtree/src/application/services/tree_service_impl.rs
use std::sync::Arc;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::tree_service::{BookmarkEdit, TreeService};
use crate::domain::bookmark::{Bookmark, BookmarkId};
use crate::domain::entry::{Entry, ListingOrder, SortKey};
use crate::domain::folder::{Folder, FolderId};
use crate::domain::path::{self, Breadcrumb};
use crate::domain::repositories::repository::TreeRepository;
use crate::domain::services::metadata::{MetadataFetcher, PageMetadata};
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct TreeServiceImpl<R: TreeRepository> {
    repository: Arc<R>,
    fetcher: Arc<dyn MetadataFetcher>,
}

impl<R: TreeRepository> TreeServiceImpl<R> {
    pub fn new(repository: Arc<R>, fetcher: Arc<dyn MetadataFetcher>) -> Self {
        Self {
            repository,
            fetcher,
        }
    }
}

/// Folder titles are path segments: non-empty and free of separators.
fn validate_folder_title(title: &str) -> ApplicationResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApplicationError::Validation(
            "Folder title must not be empty".to_string(),
        ));
    }
    if title.contains(path::SEPARATOR) {
        return Err(ApplicationError::Validation(format!(
            "Folder title must not contain '{}': {}",
            path::SEPARATOR,
            title
        )));
    }
    Ok(title)
}

/// Prefixes `http://` to a URL without a web scheme.
pub fn normalize_url(url: &str) -> ApplicationResult<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ApplicationError::Validation(
            "URL must not be empty".to_string(),
        ));
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Ok(format!("http://{}", url))
    }
}

impl<R: TreeRepository> TreeService for TreeServiceImpl<R> {
    #[instrument(skip(self), level = "debug")]
    fn create_folder(&self, parent_id: FolderId, title: &str) -> ApplicationResult<Folder> {
        let title = validate_folder_title(title)?;
        let id = self.repository.create_folder(parent_id, title)?;
        Ok(self.repository.get_folder(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn create_folder_at(&self, path: &str, title: &str) -> ApplicationResult<Folder> {
        let parent = self.repository.resolve(path)?;
        self.create_folder(parent.id, title)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_folder(&self, id: FolderId) -> ApplicationResult<Folder> {
        Ok(self.repository.get_folder(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn rename_folder(&self, id: FolderId, title: &str) -> ApplicationResult<Folder> {
        let title = validate_folder_title(title)?;
        let mut folder = self.repository.get_folder(id)?;
        folder.title = title.to_string();
        self.repository.update_folder(&folder)?;
        Ok(self.repository.get_folder(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn move_folder(&self, id: FolderId, target_path: &str) -> ApplicationResult<Folder> {
        let target = self.repository.resolve(target_path)?;
        let mut folder = self.repository.get_folder(id)?;
        folder.parent_id = Some(target.id);
        self.repository.update_folder(&folder)?;
        Ok(self.repository.get_folder(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn move_folder_to_bottom(&self, id: FolderId) -> ApplicationResult<SortKey> {
        Ok(self.repository.move_folder_to_bottom(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn delete_folder(&self, id: FolderId) -> ApplicationResult<()> {
        Ok(self.repository.delete_folder(id)?)
    }

    #[instrument(skip(self, favicon), level = "debug")]
    fn add_bookmark(
        &self,
        folder_id: FolderId,
        title: &str,
        url: &str,
        favicon: Option<&str>,
    ) -> ApplicationResult<Bookmark> {
        let id = self
            .repository
            .create_bookmark_with_favicon(folder_id, title, url, favicon)?;
        Ok(self.repository.get_bookmark(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn add_bookmark_from_url(
        &self,
        path: &str,
        url: &str,
        title: Option<&str>,
        fetch_metadata: bool,
    ) -> ApplicationResult<Bookmark> {
        let url = normalize_url(url)?;
        let folder = self.repository.resolve(path)?;

        let metadata = if fetch_metadata {
            self.fetcher.fetch_page_metadata(&url)?
        } else {
            PageMetadata::default()
        };

        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t.to_string(),
            None if !metadata.title.is_empty() => metadata.title,
            None => url.clone(),
        };
        debug!("Adding '{}' to {}", title, folder);

        self.add_bookmark(folder.id, &title, &url, metadata.favicon.as_deref())
    }

    #[instrument(skip(self), level = "debug")]
    fn get_bookmark(&self, id: BookmarkId) -> ApplicationResult<Bookmark> {
        Ok(self.repository.get_bookmark(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn update_bookmark(&self, id: BookmarkId, edit: BookmarkEdit) -> ApplicationResult<Bookmark> {
        let mut bookmark = self.repository.get_bookmark(id)?;
        if let Some(title) = edit.title {
            bookmark.title = title;
        }
        if let Some(url) = edit.url {
            bookmark.url = normalize_url(&url)?;
        }
        if let Some(comment) = edit.comment {
            bookmark.comment = comment;
        }
        self.repository.update_bookmark(&bookmark)?;
        Ok(self.repository.get_bookmark(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn move_bookmark(&self, id: BookmarkId, target_path: &str) -> ApplicationResult<Bookmark> {
        let target = self.repository.resolve(target_path)?;
        let mut bookmark = self.repository.get_bookmark(id)?;
        bookmark.folder_id = target.id;
        self.repository.update_bookmark(&bookmark)?;
        Ok(self.repository.get_bookmark(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn move_bookmark_to_bottom(&self, id: BookmarkId) -> ApplicationResult<SortKey> {
        Ok(self.repository.move_bookmark_to_bottom(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn delete_bookmark(&self, id: BookmarkId) -> ApplicationResult<()> {
        Ok(self.repository.delete_bookmark(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn list(&self, path: &str, order: ListingOrder) -> ApplicationResult<Vec<Entry>> {
        Ok(self.repository.list(path, order)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn resolve(&self, path: &str) -> ApplicationResult<Folder> {
        Ok(self.repository.resolve(path)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn breadcrumbs(&self, path: &str) -> ApplicationResult<Vec<Breadcrumb>> {
        self.repository.resolve(path)?;
        Ok(path::breadcrumbs(path))
    }
}
