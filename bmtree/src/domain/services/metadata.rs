// bmtree/src/domain/services/metadata.rs
use crate::domain::error::DomainResult;
use std::fmt::Debug;

/// What a page tells us about itself when a bookmark is added from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageMetadata {
    pub title: String,
    /// Favicon already normalized into an embeddable payload.
    pub favicon: Option<String>,
}

/// Retrieves title and favicon of a page.
///
/// Implementations fail with `DomainError::CannotFetchMetadata` when the page is
/// unreachable or has no usable title. A missing favicon is not an error.
pub trait MetadataFetcher: Debug + Send + Sync {
    fn fetch_page_metadata(&self, url: &str) -> DomainResult<PageMetadata>;
}
