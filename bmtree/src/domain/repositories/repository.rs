// bmtree/src/domain/repositories/repository.rs

use crate::domain::bookmark::{Bookmark, BookmarkId};
use crate::domain::entry::{Entry, ListingOrder, OrderedEntry, SortKey};
use crate::domain::error::DomainResult;
use crate::domain::favicon::{Favicon, FaviconId};
use crate::domain::folder::{Folder, FolderId};

/// Persistence of the folder/bookmark hierarchy, its ordering sequences and the favicon store.
///
/// Every method is one all-or-nothing unit: an entity row is never visible without
/// its order row and vice versa.
pub trait TreeRepository: std::fmt::Debug + Send + Sync {
    /// Insert a folder under `parent_id`, placed after every existing sibling.
    fn create_folder(&self, parent_id: FolderId, title: &str) -> DomainResult<FolderId>;

    fn get_folder(&self, id: FolderId) -> DomainResult<Folder>;

    /// Overwrite parent and title. A changed parent places the folder last among its new siblings.
    fn update_folder(&self, folder: &Folder) -> DomainResult<()>;

    /// Delete a folder with everything beneath it.
    fn delete_folder(&self, id: FolderId) -> DomainResult<()>;

    /// Re-place an existing folder after all of its current siblings.
    fn move_folder_to_bottom(&self, id: FolderId) -> DomainResult<SortKey>;

    /// Insert a bookmark into `folder_id`, placed after every existing sibling.
    fn create_bookmark(
        &self,
        folder_id: FolderId,
        title: &str,
        url: &str,
        favicon_id: Option<FaviconId>,
    ) -> DomainResult<BookmarkId>;

    /// Store the favicon payload (if any) and insert the bookmark referencing it, atomically.
    fn create_bookmark_with_favicon(
        &self,
        folder_id: FolderId,
        title: &str,
        url: &str,
        favicon: Option<&str>,
    ) -> DomainResult<BookmarkId>;

    /// Load a bookmark with its favicon resolved to the embeddable payload.
    fn get_bookmark(&self, id: BookmarkId) -> DomainResult<Bookmark>;

    /// Overwrite folder, title, url and comment. The favicon is left untouched.
    fn update_bookmark(&self, bookmark: &Bookmark) -> DomainResult<()>;

    fn delete_bookmark(&self, id: BookmarkId) -> DomainResult<()>;

    /// Re-place an existing bookmark after all of its current siblings.
    fn move_bookmark_to_bottom(&self, id: BookmarkId) -> DomainResult<SortKey>;

    /// One past the highest sort key used by any folder or bookmark directly under `parent_id`.
    fn next_sort_key(&self, parent_id: FolderId) -> DomainResult<SortKey>;

    /// Store a favicon payload, reusing the existing row for identical content.
    fn add_favicon(&self, data_url: &str) -> DomainResult<FaviconId>;

    fn get_favicon(&self, id: FaviconId) -> DomainResult<Favicon>;

    /// Walk `path` from the root folder.
    fn resolve(&self, path: &str) -> DomainResult<Folder>;

    /// Direct children of a folder with their sort keys, in no particular order.
    fn children(&self, folder_id: FolderId) -> DomainResult<Vec<OrderedEntry>>;

    /// Resolve `path` and return its children projected by `order`.
    fn list(&self, path: &str, order: ListingOrder) -> DomainResult<Vec<Entry>>;
}
