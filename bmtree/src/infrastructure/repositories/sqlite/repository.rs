// src/infrastructure/repositories/sqlite/repository.rs

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Integer;
use tracing::{debug, instrument, trace};

use super::connection::{ConnectionPool, PooledConnection};
use super::error::{SqliteRepositoryError, SqliteResult};
use super::model::{
    BookmarkChildRow, BookmarkOrder, DbBookmark, DbBookmarkChanges, DbFavicon, DbFolder,
    DbFolderChanges, FolderChildRow, FolderOrder, MaxSortKey, NewBookmark, NewFavicon, NewFolder,
};
use super::schema::{bookmarks, bookmarks_order, favicons, folders, folders_order};
use crate::domain::bookmark::{Bookmark, BookmarkId};
use crate::domain::entry::{arrange, next_sort_key, Entry, ListingOrder, OrderedEntry, SortKey};
use crate::domain::error::DomainResult;
use crate::domain::favicon::{Favicon, FaviconId};
use crate::domain::folder::{Folder, FolderId, ROOT_FOLDER_ID};
use crate::domain::path;
use crate::domain::repositories::repository::TreeRepository;

/// Highest sort key in the ordering sequence of `parent_id`, over folders and bookmarks alike.
const MAX_SIBLING_SORT_KEY: &str = "
    SELECT MAX(sort_key) AS max_key FROM (
        SELECT fo.sort_key FROM folders_order AS fo
            INNER JOIN folders AS f ON f.folder_id = fo.folder_id
            WHERE f.parent_id = ?
        UNION ALL
        SELECT bo.sort_key FROM bookmarks_order AS bo
            INNER JOIN bookmarks AS b ON b.bookmark_id = bo.bookmark_id
            WHERE b.folder_id = ?
    )";

const CHILD_FOLDERS: &str = "
    SELECT f.folder_id, f.parent_id, f.title, fo.sort_key FROM folders AS f
        INNER JOIN folders_order AS fo ON f.folder_id = fo.folder_id
        WHERE f.parent_id = ?";

const CHILD_BOOKMARKS: &str = "
    SELECT b.bookmark_id, b.folder_id, b.title, b.url, b.comment, b.favicon_id,
           fav.data_url AS favicon, bo.sort_key
        FROM bookmarks AS b
        INNER JOIN bookmarks_order AS bo ON b.bookmark_id = bo.bookmark_id
        LEFT JOIN favicons AS fav ON fav.favicon_id = b.favicon_id
        WHERE b.folder_id = ?";

#[derive(Clone, Debug)]
pub struct SqliteTreeRepository {
    pool: ConnectionPool,
}

impl SqliteTreeRepository {
    /// Create a new SQLite repository with the provided connection pool
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Create a new SQLite repository with the provided database URL, running pending migrations
    #[instrument(skip_all, level = "debug")]
    pub fn from_url(database_url: &str) -> SqliteResult<Self> {
        let pool = super::connection::init_pool(database_url)?;
        Ok(Self { pool })
    }

    /// Get a connection from the pool
    #[instrument(skip_all, level = "trace")]
    pub fn get_connection(&self) -> SqliteResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| SqliteRepositoryError::ConnectionPoolError(e.to_string()))
    }

    /// Run `f` as one write transaction.
    ///
    /// `BEGIN IMMEDIATE` takes the database write lock before the first read, so the
    /// next-sort-key read and the order upsert of concurrent appends cannot interleave.
    fn write<T, F>(&self, f: F) -> SqliteResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> SqliteResult<T>,
    {
        let mut pooled = self.get_connection()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.immediate_transaction::<T, SqliteRepositoryError, _>(f)
    }

    /// Run `f` as one read transaction, so multi-statement reads see a single snapshot.
    fn read<T, F>(&self, f: F) -> SqliteResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> SqliteResult<T>,
    {
        let mut pooled = self.get_connection()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.transaction::<T, SqliteRepositoryError, _>(f)
    }
}

fn to_domain_folder(db_folder: DbFolder) -> Folder {
    Folder::new(db_folder.folder_id, db_folder.parent_id, db_folder.title)
}

fn to_domain_bookmark(db_bookmark: DbBookmark, favicon: Option<String>) -> Bookmark {
    Bookmark {
        id: db_bookmark.bookmark_id,
        folder_id: db_bookmark.folder_id,
        title: db_bookmark.title,
        url: db_bookmark.url,
        comment: db_bookmark.comment,
        favicon_id: db_bookmark.favicon_id,
        favicon,
    }
}

fn find_folder(conn: &mut SqliteConnection, id: FolderId) -> SqliteResult<DbFolder> {
    folders::table
        .find(id)
        .first::<DbFolder>(conn)
        .optional()?
        .ok_or(SqliteRepositoryError::FolderNotFound(id))
}

fn find_bookmark(conn: &mut SqliteConnection, id: BookmarkId) -> SqliteResult<DbBookmark> {
    bookmarks::table
        .find(id)
        .first::<DbBookmark>(conn)
        .optional()?
        .ok_or(SqliteRepositoryError::BookmarkNotFound(id))
}

fn favicon_payload(
    conn: &mut SqliteConnection,
    favicon_id: Option<FaviconId>,
) -> SqliteResult<Option<String>> {
    let Some(favicon_id) = favicon_id else {
        return Ok(None);
    };
    Ok(favicons::table
        .find(favicon_id)
        .select(favicons::data_url)
        .first::<String>(conn)
        .optional()?)
}

fn max_sibling_sort_key(
    conn: &mut SqliteConnection,
    parent_id: FolderId,
) -> SqliteResult<Option<SortKey>> {
    let row = sql_query(MAX_SIBLING_SORT_KEY)
        .bind::<Integer, _>(parent_id)
        .bind::<Integer, _>(parent_id)
        .get_result::<MaxSortKey>(conn)?;
    Ok(row.max_key)
}

/// Upsert the folder's order row with the next key of `parent_id`.
fn place_folder_last(
    conn: &mut SqliteConnection,
    folder_id: FolderId,
    parent_id: FolderId,
) -> SqliteResult<SortKey> {
    let sort_key = next_sort_key(max_sibling_sort_key(conn, parent_id)?);
    diesel::insert_into(folders_order::table)
        .values(&FolderOrder {
            folder_id,
            sort_key,
        })
        .on_conflict(folders_order::folder_id)
        .do_update()
        .set(folders_order::sort_key.eq(sort_key))
        .execute(conn)?;
    trace!(folder_id, parent_id, sort_key, "placed folder last");
    Ok(sort_key)
}

/// Upsert the bookmark's order row with the next key of `folder_id`.
fn place_bookmark_last(
    conn: &mut SqliteConnection,
    bookmark_id: BookmarkId,
    folder_id: FolderId,
) -> SqliteResult<SortKey> {
    let sort_key = next_sort_key(max_sibling_sort_key(conn, folder_id)?);
    diesel::insert_into(bookmarks_order::table)
        .values(&BookmarkOrder {
            bookmark_id,
            sort_key,
        })
        .on_conflict(bookmarks_order::bookmark_id)
        .do_update()
        .set(bookmarks_order::sort_key.eq(sort_key))
        .execute(conn)?;
    trace!(bookmark_id, folder_id, sort_key, "placed bookmark last");
    Ok(sort_key)
}

fn insert_bookmark(
    conn: &mut SqliteConnection,
    folder_id: FolderId,
    title: &str,
    url: &str,
    favicon_id: Option<FaviconId>,
) -> SqliteResult<BookmarkId> {
    let new_bookmark = NewBookmark {
        folder_id,
        title,
        url,
        comment: "",
        favicon_id,
    };
    debug!("Inserting bookmark: {:?}", new_bookmark);

    let bookmark_id = diesel::insert_into(bookmarks::table)
        .values(&new_bookmark)
        .returning(bookmarks::bookmark_id)
        .get_result::<i32>(conn)?;
    place_bookmark_last(conn, bookmark_id, folder_id)?;
    Ok(bookmark_id)
}

/// Order row first, then the entity row.
fn remove_bookmark(conn: &mut SqliteConnection, bookmark_id: BookmarkId) -> SqliteResult<usize> {
    diesel::delete(bookmarks_order::table.find(bookmark_id)).execute(conn)?;
    let removed = diesel::delete(bookmarks::table.find(bookmark_id)).execute(conn)?;
    Ok(removed)
}

fn store_favicon(conn: &mut SqliteConnection, data_url: &str) -> SqliteResult<FaviconId> {
    let content_hash = Favicon::content_hash(data_url);

    let existing = favicons::table
        .filter(favicons::content_hash.eq(content_hash.as_slice()))
        .select(favicons::favicon_id)
        .first::<i32>(conn)
        .optional()?;
    if let Some(favicon_id) = existing {
        debug!(favicon_id, "Favicon already stored");
        return Ok(favicon_id);
    }

    let favicon_id = diesel::insert_into(favicons::table)
        .values(&NewFavicon {
            data_url,
            content_hash: content_hash.as_slice(),
        })
        .returning(favicons::favicon_id)
        .get_result::<i32>(conn)?;
    Ok(favicon_id)
}

/// The folder itself followed by all of its descendants, parents before children.
fn collect_subtree(
    conn: &mut SqliteConnection,
    folder_id: FolderId,
) -> SqliteResult<Vec<FolderId>> {
    let mut subtree = vec![folder_id];
    let mut next = 0;
    while next < subtree.len() {
        let children = folders::table
            .filter(folders::parent_id.eq(subtree[next]))
            .select(folders::folder_id)
            .load::<i32>(conn)?;
        subtree.extend(children);
        next += 1;
    }
    Ok(subtree)
}

/// True if `folder_id` is `ancestor_id` or lies somewhere beneath it.
fn is_within(
    conn: &mut SqliteConnection,
    folder_id: FolderId,
    ancestor_id: FolderId,
) -> SqliteResult<bool> {
    let mut current = Some(folder_id);
    while let Some(id) = current {
        if id == ancestor_id {
            return Ok(true);
        }
        current = folders::table
            .find(id)
            .select(folders::parent_id)
            .first::<Option<i32>>(conn)
            .optional()?
            .flatten();
    }
    Ok(false)
}

fn resolve_path(conn: &mut SqliteConnection, folder_path: &str) -> SqliteResult<DbFolder> {
    let mut current = ROOT_FOLDER_ID;
    for segment in path::segments(folder_path) {
        // duplicate sibling titles: lowest id wins
        current = folders::table
            .filter(folders::parent_id.eq(current))
            .filter(folders::title.eq(segment))
            .order(folders::folder_id.asc())
            .select(folders::folder_id)
            .first::<i32>(conn)
            .optional()?
            .ok_or_else(|| SqliteRepositoryError::PathNotFound(path::normalize(folder_path)))?;
    }
    find_folder(conn, current)
}

fn load_children(
    conn: &mut SqliteConnection,
    folder_id: FolderId,
) -> SqliteResult<Vec<OrderedEntry>> {
    let folder_rows = sql_query(CHILD_FOLDERS)
        .bind::<Integer, _>(folder_id)
        .load::<FolderChildRow>(conn)?;
    let bookmark_rows = sql_query(CHILD_BOOKMARKS)
        .bind::<Integer, _>(folder_id)
        .load::<BookmarkChildRow>(conn)?;

    let folders = folder_rows.into_iter().map(|row| {
        OrderedEntry::new(
            row.sort_key,
            Entry::Folder(Folder::new(row.folder_id, row.parent_id, row.title)),
        )
    });
    let bookmarks = bookmark_rows.into_iter().map(|row| {
        OrderedEntry::new(
            row.sort_key,
            Entry::Bookmark(Bookmark {
                id: row.bookmark_id,
                folder_id: row.folder_id,
                title: row.title,
                url: row.url,
                comment: row.comment,
                favicon_id: row.favicon_id,
                favicon: row.favicon,
            }),
        )
    });

    Ok(folders.chain(bookmarks).collect())
}

impl TreeRepository for SqliteTreeRepository {
    #[instrument(skip(self), level = "debug")]
    fn create_folder(&self, parent_id: FolderId, title: &str) -> DomainResult<FolderId> {
        let folder_id = self.write(|conn| {
            let folder_id = diesel::insert_into(folders::table)
                .values(&NewFolder { parent_id, title })
                .returning(folders::folder_id)
                .get_result::<i32>(conn)?;
            place_folder_last(conn, folder_id, parent_id)?;
            Ok(folder_id)
        })?;
        debug!(folder_id, "Created folder");
        Ok(folder_id)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_folder(&self, id: FolderId) -> DomainResult<Folder> {
        let mut conn = self.get_connection()?;
        Ok(to_domain_folder(find_folder(&mut conn, id)?))
    }

    #[instrument(skip(self), level = "debug")]
    fn update_folder(&self, folder: &Folder) -> DomainResult<()> {
        self.write(|conn| {
            if folder.is_root() {
                return Err(SqliteRepositoryError::InvalidOperation(
                    "the root folder cannot be changed".to_string(),
                ));
            }
            let current = find_folder(conn, folder.id)?;
            let parent_id = folder.parent_id.ok_or_else(|| {
                SqliteRepositoryError::InvalidOperation(format!(
                    "folder {} needs a parent folder",
                    folder.id
                ))
            })?;

            let reparented = current.parent_id != Some(parent_id);
            if reparented && is_within(conn, parent_id, folder.id)? {
                return Err(SqliteRepositoryError::InvalidOperation(format!(
                    "cannot move folder {} into itself or one of its descendants",
                    folder.id
                )));
            }

            diesel::update(folders::table.find(folder.id))
                .set(&DbFolderChanges {
                    parent_id: Some(parent_id),
                    title: &folder.title,
                })
                .execute(conn)?;

            if reparented {
                place_folder_last(conn, folder.id, parent_id)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn delete_folder(&self, id: FolderId) -> DomainResult<()> {
        self.write(|conn| {
            if id == ROOT_FOLDER_ID {
                return Err(SqliteRepositoryError::InvalidOperation(
                    "the root folder cannot be deleted".to_string(),
                ));
            }
            find_folder(conn, id)?;

            // children go before their parents
            let subtree = collect_subtree(conn, id)?;
            for &folder_id in subtree.iter().rev() {
                let bookmark_ids = bookmarks::table
                    .filter(bookmarks::folder_id.eq(folder_id))
                    .select(bookmarks::bookmark_id)
                    .load::<i32>(conn)?;
                for bookmark_id in bookmark_ids {
                    remove_bookmark(conn, bookmark_id)?;
                }
                diesel::delete(folders_order::table.find(folder_id)).execute(conn)?;
                diesel::delete(folders::table.find(folder_id)).execute(conn)?;
            }
            debug!("Deleted {} folder(s) below and including {}", subtree.len(), id);
            Ok(())
        })?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn move_folder_to_bottom(&self, id: FolderId) -> DomainResult<SortKey> {
        let sort_key = self.write(|conn| {
            let folder = find_folder(conn, id)?;
            let parent_id = folder.parent_id.ok_or_else(|| {
                SqliteRepositoryError::InvalidOperation(
                    "the root folder has no siblings".to_string(),
                )
            })?;
            place_folder_last(conn, id, parent_id)
        })?;
        Ok(sort_key)
    }

    #[instrument(skip(self), level = "debug")]
    fn create_bookmark(
        &self,
        folder_id: FolderId,
        title: &str,
        url: &str,
        favicon_id: Option<FaviconId>,
    ) -> DomainResult<BookmarkId> {
        let bookmark_id =
            self.write(|conn| insert_bookmark(conn, folder_id, title, url, favicon_id))?;
        Ok(bookmark_id)
    }

    #[instrument(skip(self, favicon), level = "debug")]
    fn create_bookmark_with_favicon(
        &self,
        folder_id: FolderId,
        title: &str,
        url: &str,
        favicon: Option<&str>,
    ) -> DomainResult<BookmarkId> {
        let bookmark_id = self.write(|conn| {
            let favicon_id = favicon
                .map(|data_url| store_favicon(conn, data_url))
                .transpose()?;
            insert_bookmark(conn, folder_id, title, url, favicon_id)
        })?;
        Ok(bookmark_id)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_bookmark(&self, id: BookmarkId) -> DomainResult<Bookmark> {
        let bookmark = self.read(|conn| {
            let db_bookmark = find_bookmark(conn, id)?;
            let favicon = favicon_payload(conn, db_bookmark.favicon_id)?;
            Ok(to_domain_bookmark(db_bookmark, favicon))
        })?;
        Ok(bookmark)
    }

    #[instrument(skip(self), level = "debug")]
    fn update_bookmark(&self, bookmark: &Bookmark) -> DomainResult<()> {
        self.write(|conn| {
            let current = find_bookmark(conn, bookmark.id)?;

            diesel::update(bookmarks::table.find(bookmark.id))
                .set(&DbBookmarkChanges {
                    folder_id: bookmark.folder_id,
                    title: &bookmark.title,
                    url: &bookmark.url,
                    comment: &bookmark.comment,
                })
                .execute(conn)?;

            if current.folder_id != bookmark.folder_id {
                place_bookmark_last(conn, bookmark.id, bookmark.folder_id)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn delete_bookmark(&self, id: BookmarkId) -> DomainResult<()> {
        self.write(|conn| match remove_bookmark(conn, id)? {
            0 => Err(SqliteRepositoryError::BookmarkNotFound(id)),
            _ => Ok(()),
        })?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn move_bookmark_to_bottom(&self, id: BookmarkId) -> DomainResult<SortKey> {
        let sort_key = self.write(|conn| {
            let bookmark = find_bookmark(conn, id)?;
            place_bookmark_last(conn, id, bookmark.folder_id)
        })?;
        Ok(sort_key)
    }

    #[instrument(skip(self), level = "trace")]
    fn next_sort_key(&self, parent_id: FolderId) -> DomainResult<SortKey> {
        let mut conn = self.get_connection()?;
        Ok(next_sort_key(max_sibling_sort_key(&mut conn, parent_id)?))
    }

    #[instrument(skip_all, level = "debug")]
    fn add_favicon(&self, data_url: &str) -> DomainResult<FaviconId> {
        let favicon_id = self.write(|conn| store_favicon(conn, data_url))?;
        Ok(favicon_id)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_favicon(&self, id: FaviconId) -> DomainResult<Favicon> {
        let mut conn = self.get_connection()?;
        let db_favicon = favicons::table
            .find(id)
            .first::<DbFavicon>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?
            .ok_or(SqliteRepositoryError::FaviconNotFound(id))?;
        Ok(Favicon {
            id: db_favicon.favicon_id,
            data_url: db_favicon.data_url,
        })
    }

    #[instrument(skip(self), level = "debug")]
    fn resolve(&self, path: &str) -> DomainResult<Folder> {
        let folder = self.read(|conn| resolve_path(conn, path))?;
        Ok(to_domain_folder(folder))
    }

    #[instrument(skip(self), level = "debug")]
    fn children(&self, folder_id: FolderId) -> DomainResult<Vec<OrderedEntry>> {
        let entries = self.read(|conn| {
            find_folder(conn, folder_id)?;
            load_children(conn, folder_id)
        })?;
        Ok(entries)
    }

    #[instrument(skip(self), level = "debug")]
    fn list(&self, path: &str, order: ListingOrder) -> DomainResult<Vec<Entry>> {
        let entries = self.read(|conn| {
            let folder = resolve_path(conn, path)?;
            load_children(conn, folder.folder_id)
        })?;
        trace!("{} entries below {}", entries.len(), path);
        Ok(arrange(entries, order))
    }
}
