// bmtree/src/domain/bookmark.rs
use crate::domain::favicon::FaviconId;
use crate::domain::folder::FolderId;
use derive_builder::Builder;
use serde::Serialize;
use std::fmt;

pub type BookmarkId = i32;

/// A leaf of the hierarchy. Belongs to exactly one folder.
///
/// `favicon` holds the embeddable payload resolved from the favicon store, it is
/// read-only for updates: only folder, title, url and comment are written back.
#[derive(Builder, Clone, PartialEq, Eq, Serialize)]
#[builder(setter(into))]
pub struct Bookmark {
    pub id: BookmarkId,
    pub folder_id: FolderId,
    pub title: String,
    pub url: String,
    #[builder(default)]
    pub comment: String,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_id: Option<FaviconId>,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl Bookmark {
    pub fn has_favicon(&self) -> bool {
        self.favicon.is_some()
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.title, self.url)
    }
}

impl fmt::Debug for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bookmark")
            .field("id", &self.id)
            .field("folder_id", &self.folder_id)
            .field("title", &self.title)
            .field("url", &self.url)
            .field("comment", &self.comment)
            .field("favicon_id", &self.favicon_id)
            // data URIs get long, only show the head
            .field(
                "favicon",
                &self
                    .favicon
                    .as_ref()
                    .map(|f| f.chars().take(32).collect::<String>()),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_builder_without_optionals_when_build_then_defaults_apply() {
        let bm = BookmarkBuilder::default()
            .id(1)
            .folder_id(0)
            .title("Example")
            .url("http://example.com")
            .build()
            .unwrap();

        assert_eq!(bm.comment, "");
        assert_eq!(bm.favicon_id, None);
        assert!(!bm.has_favicon());
        assert_eq!(bm.to_string(), "Example <http://example.com>");
    }

    #[test]
    fn given_builder_with_favicon_when_build_then_payload_set() {
        let bm = BookmarkBuilder::default()
            .id(2)
            .folder_id(7)
            .title("t")
            .url("u")
            .comment("note")
            .favicon_id(3)
            .favicon("data:image/png;base64,AAAA")
            .build()
            .unwrap();

        assert_eq!(bm.favicon_id, Some(3));
        assert!(bm.has_favicon());
        assert_eq!(bm.comment, "note");
    }

    #[test]
    fn given_missing_url_when_build_then_error() {
        let result = BookmarkBuilder::default()
            .id(2)
            .folder_id(7)
            .title("t")
            .build();
        assert!(result.is_err());
    }
}
