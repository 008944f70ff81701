use bmtree::application::error::ApplicationResult;
use bmtree::application::services::tree_service::TreeService;
use bmtree::domain::entry::{Entry, ListingOrder};
use bmtree::domain::error::{DomainError, DomainResult};
use bmtree::domain::services::metadata::{MetadataFetcher, PageMetadata};
use bmtree::infrastructure::di::ServiceContainer;
use bmtree::util::testing::{setup_test_db, TestDb};
use rstest::*;
use std::sync::Arc;

/// Every page has the same title and icon.
#[derive(Debug)]
struct SameIconFetcher;

impl MetadataFetcher for SameIconFetcher {
    fn fetch_page_metadata(&self, url: &str) -> DomainResult<PageMetadata> {
        if url.contains("unreachable") {
            return Err(DomainError::CannotFetchMetadata(url.to_string()));
        }
        Ok(PageMetadata {
            title: format!("Page {}", url),
            favicon: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
        })
    }
}

struct Ctx {
    container: ServiceContainer,
    _db: TestDb,
}

#[fixture]
fn ctx() -> Ctx {
    let db = setup_test_db();
    let container =
        ServiceContainer::with_parts(Arc::new(db.repo.clone()), Arc::new(SameIconFetcher));
    Ctx { container, _db: db }
}

#[rstest]
fn given_two_pages_with_same_icon_when_added_then_one_favicon_shared(
    ctx: Ctx,
) -> ApplicationResult<()> {
    let service = &ctx.container.tree_service;
    service.create_folder_at("/", "news")?;

    let first = service.add_bookmark_from_url("/news", "a.org", None, true)?;
    let second = service.add_bookmark_from_url("news", "https://b.org", None, true)?;

    assert_eq!(first.title, "Page http://a.org");
    assert!(first.favicon_id.is_some());
    assert_eq!(first.favicon_id, second.favicon_id);
    assert_eq!(first.favicon, second.favicon);
    Ok(())
}

#[rstest]
fn given_unreachable_page_when_added_then_error_and_folder_unchanged(
    ctx: Ctx,
) -> ApplicationResult<()> {
    let service = &ctx.container.tree_service;

    let result = service.add_bookmark_from_url("/", "unreachable.example", None, true);

    assert!(result.is_err());
    assert!(service.list("/", ListingOrder::FoldersFirst)?.is_empty());
    Ok(())
}

#[rstest]
fn given_mixed_children_when_listed_then_both_projections_agree_on_relative_order(
    ctx: Ctx,
) -> ApplicationResult<()> {
    let service = &ctx.container.tree_service;
    let root = service.resolve("/")?;
    service.add_bookmark(root.id, "b1", "http://b1", None)?;
    service.create_folder(root.id, "f1")?;
    service.add_bookmark(root.id, "b2", "http://b2", None)?;
    service.create_folder(root.id, "f2")?;

    let interleaved = service.list("/", ListingOrder::Interleaved)?;
    let folders_first = service.list("/", ListingOrder::FoldersFirst)?;

    let only = |entries: &[Entry], folders: bool| -> Vec<String> {
        entries
            .iter()
            .filter(|e| e.is_folder() == folders)
            .map(|e| e.title().to_string())
            .collect()
    };
    assert_eq!(only(&interleaved, true), only(&folders_first, true));
    assert_eq!(only(&interleaved, false), only(&folders_first, false));
    assert!(folders_first[..2].iter().all(Entry::is_folder));
    Ok(())
}
