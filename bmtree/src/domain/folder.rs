// bmtree/src/domain/folder.rs
use serde::Serialize;
use std::fmt;

pub type FolderId = i32;

/// Identifier of the root folder. The root always exists, has no parent and an empty title.
pub const ROOT_FOLDER_ID: FolderId = 0;

/// A node of the hierarchy which may hold other folders and bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    pub id: FolderId,
    pub parent_id: Option<FolderId>,
    pub title: String,
}

impl Folder {
    pub fn new<S: Into<String>>(id: FolderId, parent_id: Option<FolderId>, title: S) -> Self {
        Self {
            id,
            parent_id,
            title: title.into(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_FOLDER_ID, None, "")
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_FOLDER_ID
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "/")
        } else {
            write!(f, "{}/", self.title)
        }
    }
}
