// bmtree/src/application/services/tree_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::bookmark::{Bookmark, BookmarkId};
use crate::domain::entry::{Entry, ListingOrder, SortKey};
use crate::domain::folder::{Folder, FolderId};
use crate::domain::path::Breadcrumb;
use std::fmt::Debug;

/// Changes to apply to a bookmark; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkEdit {
    pub title: Option<String>,
    pub url: Option<String>,
    pub comment: Option<String>,
}

/// Service interface for the folder and bookmark hierarchy
pub trait TreeService: Send + Sync + Debug {
    /// Create a folder as last child of `parent_id`
    fn create_folder(&self, parent_id: FolderId, title: &str) -> ApplicationResult<Folder>;

    /// Create a folder as last child of the folder at `path`
    fn create_folder_at(&self, path: &str, title: &str) -> ApplicationResult<Folder>;

    fn get_folder(&self, id: FolderId) -> ApplicationResult<Folder>;

    fn rename_folder(&self, id: FolderId, title: &str) -> ApplicationResult<Folder>;

    /// Re-parent a folder below the folder at `target_path`, placing it last
    fn move_folder(&self, id: FolderId, target_path: &str) -> ApplicationResult<Folder>;

    fn move_folder_to_bottom(&self, id: FolderId) -> ApplicationResult<SortKey>;

    /// Delete a folder with everything below it
    fn delete_folder(&self, id: FolderId) -> ApplicationResult<()>;

    /// Create a bookmark as last child of `folder_id`
    fn add_bookmark(
        &self,
        folder_id: FolderId,
        title: &str,
        url: &str,
        favicon: Option<&str>,
    ) -> ApplicationResult<Bookmark>;

    /// Create a bookmark in the folder at `path`, taking title and favicon from the page
    ///
    /// A given `title` wins over the fetched one. Without `fetch_metadata` no request is made.
    fn add_bookmark_from_url(
        &self,
        path: &str,
        url: &str,
        title: Option<&str>,
        fetch_metadata: bool,
    ) -> ApplicationResult<Bookmark>;

    fn get_bookmark(&self, id: BookmarkId) -> ApplicationResult<Bookmark>;

    fn update_bookmark(&self, id: BookmarkId, edit: BookmarkEdit) -> ApplicationResult<Bookmark>;

    /// Move a bookmark into the folder at `target_path`, placing it last
    fn move_bookmark(&self, id: BookmarkId, target_path: &str) -> ApplicationResult<Bookmark>;

    fn move_bookmark_to_bottom(&self, id: BookmarkId) -> ApplicationResult<SortKey>;

    fn delete_bookmark(&self, id: BookmarkId) -> ApplicationResult<()>;

    /// Direct children of the folder at `path`
    fn list(&self, path: &str, order: ListingOrder) -> ApplicationResult<Vec<Entry>>;

    fn resolve(&self, path: &str) -> ApplicationResult<Folder>;

    /// Crumbs from the root to the folder at `path`, which has to exist
    fn breadcrumbs(&self, path: &str) -> ApplicationResult<Vec<Breadcrumb>>;
}
