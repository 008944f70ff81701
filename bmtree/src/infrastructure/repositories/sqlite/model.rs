use diesel::sql_types::{BigInt, Integer, Nullable, Text};
use diesel::{AsChangeset, Insertable, Queryable, QueryableByName};
use std::fmt;

use crate::infrastructure::repositories::sqlite::schema::{
    bookmarks, bookmarks_order, favicons, folders, folders_order,
};

#[derive(Queryable, Debug, Clone)]
pub struct DbFolder {
    pub folder_id: i32,
    pub parent_id: Option<i32>,
    pub title: String,
}

/// New folder for insertion
#[derive(Insertable, Debug)]
#[diesel(table_name = folders)]
pub struct NewFolder<'a> {
    pub parent_id: i32,
    pub title: &'a str,
}

/// Changes for updating a folder
#[derive(AsChangeset, Debug)]
#[diesel(table_name = folders)]
#[diesel(treat_none_as_null = true)]
pub struct DbFolderChanges<'a> {
    pub parent_id: Option<i32>,
    pub title: &'a str,
}

#[derive(Queryable, Clone)]
pub struct DbBookmark {
    pub bookmark_id: i32,
    pub folder_id: i32,
    pub title: String,
    pub url: String,
    pub comment: String,
    pub favicon_id: Option<i32>,
}

impl fmt::Display for DbBookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bookmark_id: {}, folder_id: {}, title: {}, url: {}, comment: {}, favicon_id: {}",
            self.bookmark_id,
            self.folder_id,
            self.title,
            self.url,
            self.comment,
            self.favicon_id.map_or("None".to_string(), |id| id.to_string())
        )
    }
}

impl fmt::Debug for DbBookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// New bookmark for insertion
#[derive(Insertable, Debug)]
#[diesel(table_name = bookmarks)]
pub struct NewBookmark<'a> {
    pub folder_id: i32,
    pub title: &'a str,
    pub url: &'a str,
    pub comment: &'a str,
    pub favicon_id: Option<i32>,
}

/// Changes for updating a bookmark, favicon is not part of it
#[derive(AsChangeset, Debug)]
#[diesel(table_name = bookmarks)]
pub struct DbBookmarkChanges<'a> {
    pub folder_id: i32,
    pub title: &'a str,
    pub url: &'a str,
    pub comment: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = folders_order)]
pub struct FolderOrder {
    pub folder_id: i32,
    pub sort_key: i64,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = bookmarks_order)]
pub struct BookmarkOrder {
    pub bookmark_id: i32,
    pub sort_key: i64,
}

#[derive(Queryable, Debug, Clone)]
pub struct DbFavicon {
    pub favicon_id: i32,
    pub data_url: String,
    pub content_hash: Vec<u8>,
}

/// New favicon for insertion
#[derive(Insertable)]
#[diesel(table_name = favicons)]
pub struct NewFavicon<'a> {
    pub data_url: &'a str,
    pub content_hash: &'a [u8],
}

#[derive(QueryableByName, Debug)]
pub struct MaxSortKey {
    #[diesel(sql_type = Nullable<BigInt>)]
    pub max_key: Option<i64>,
}

/// Child folder row joined with its order entry
#[derive(QueryableByName, Debug)]
pub struct FolderChildRow {
    #[diesel(sql_type = Integer)]
    pub folder_id: i32,
    #[diesel(sql_type = Nullable<Integer>)]
    pub parent_id: Option<i32>,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = BigInt)]
    pub sort_key: i64,
}

/// Child bookmark row joined with its order entry and favicon payload
#[derive(QueryableByName, Debug)]
pub struct BookmarkChildRow {
    #[diesel(sql_type = Integer)]
    pub bookmark_id: i32,
    #[diesel(sql_type = Integer)]
    pub folder_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub url: String,
    #[diesel(sql_type = Text)]
    pub comment: String,
    #[diesel(sql_type = Nullable<Integer>)]
    pub favicon_id: Option<i32>,
    #[diesel(sql_type = Nullable<Text>)]
    pub favicon: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub sort_key: i64,
}
