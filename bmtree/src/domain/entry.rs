// bmtree/src/domain/entry.rs
//! Listing elements and the two projections of a folder's ordering sequence.
//!
//! Folders and bookmarks under one parent share a single sort-key space. The
//! folders-first projection keeps each kind in its own relative order and puts
//! all folders before all bookmarks. The interleaved projection orders purely by
//! sort key.
use crate::domain::bookmark::Bookmark;
use crate::domain::folder::Folder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub type SortKey = i64;

/// Sort key handed out to the first child of an empty folder.
pub const FIRST_SORT_KEY: SortKey = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Folder(Folder),
    Bookmark(Bookmark),
}

impl Entry {
    pub fn id(&self) -> i32 {
        match self {
            Entry::Folder(f) => f.id,
            Entry::Bookmark(b) => b.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Entry::Folder(f) => &f.title,
            Entry::Bookmark(b) => &b.title,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Entry::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Entry::Folder(f) => Some(f),
            Entry::Bookmark(_) => None,
        }
    }

    pub fn as_bookmark(&self) -> Option<&Bookmark> {
        match self {
            Entry::Bookmark(b) => Some(b),
            Entry::Folder(_) => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Entry::Folder(_) => 0,
            Entry::Bookmark(_) => 1,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Folder(folder) => write!(f, "{}", folder),
            Entry::Bookmark(bookmark) => write!(f, "{}", bookmark),
        }
    }
}

/// A child entity together with its position in the parent's ordering sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEntry {
    pub sort_key: SortKey,
    pub entry: Entry,
}

impl OrderedEntry {
    pub fn new(sort_key: SortKey, entry: Entry) -> Self {
        Self { sort_key, entry }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingOrder {
    #[default]
    FoldersFirst,
    Interleaved,
}

impl ListingOrder {
    pub fn from_folders_first(folders_first: bool) -> Self {
        if folders_first {
            ListingOrder::FoldersFirst
        } else {
            ListingOrder::Interleaved
        }
    }
}

/// The sort key that places a new child after every existing sibling.
pub fn next_sort_key(max_existing: Option<SortKey>) -> SortKey {
    max_existing.map_or(FIRST_SORT_KEY, |max| max + 1)
}

/// Projects the ordering sequence of one folder into a listing.
///
/// Equal sort keys fall back to folders before bookmarks, then ascending id.
pub fn arrange(mut entries: Vec<OrderedEntry>, order: ListingOrder) -> Vec<Entry> {
    let tie_break = |a: &OrderedEntry, b: &OrderedEntry| -> Ordering {
        a.entry
            .kind_rank()
            .cmp(&b.entry.kind_rank())
            .then_with(|| a.entry.id().cmp(&b.entry.id()))
    };

    match order {
        ListingOrder::FoldersFirst => entries.sort_by(|a, b| {
            a.entry
                .kind_rank()
                .cmp(&b.entry.kind_rank())
                .then_with(|| a.sort_key.cmp(&b.sort_key))
                .then_with(|| tie_break(a, b))
        }),
        ListingOrder::Interleaved => entries.sort_by(|a, b| {
            a.sort_key
                .cmp(&b.sort_key)
                .then_with(|| tie_break(a, b))
        }),
    }

    entries.into_iter().map(|e| e.entry).collect()
}
