use crate::domain::error::{DomainError, DomainResult};
use crate::domain::favicon::is_data_url;
use crate::domain::services::metadata::{MetadataFetcher, PageMetadata};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use select::document::Document;
use select::predicate::{Attr, Name, Predicate};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const DEFAULT_ICON_TYPE: &str = "image/x-icon";

/// Fetches page title and favicon over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMetadataFetcher {
    client: Client,
}

impl HttpMetadataFetcher {
    pub fn new(timeout_milliseconds: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_milliseconds))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    fn get_text(&self, url: &str) -> DomainResult<String> {
        self.client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| DomainError::CannotFetchMetadata(format!("{}: {}", url, e)))
    }

    /// Downloads an icon and encodes it as a data URI.
    fn download_icon(&self, icon_url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(icon_url).send()?.error_for_status()?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ICON_TYPE.to_string());
        let bytes = response.bytes()?;
        Ok(encode_data_url(&content_type, &bytes))
    }
}

impl MetadataFetcher for HttpMetadataFetcher {
    #[instrument(skip(self), level = "debug")]
    fn fetch_page_metadata(&self, url: &str) -> DomainResult<PageMetadata> {
        let body = self.get_text(url)?;
        let document = Document::from(body.as_str());

        let title = page_title(&document).ok_or_else(|| {
            DomainError::CannotFetchMetadata(format!("{}: page has no title", url))
        })?;

        let favicon = match icon_location(&document, url) {
            Some(location) if is_data_url(&location) => Some(location),
            Some(location) => match self.download_icon(&location) {
                Ok(data_url) => Some(data_url),
                Err(e) => {
                    warn!("Cannot load favicon {}: {}", location, e);
                    None
                }
            },
            None => None,
        };
        debug!("title: {:?}, favicon: {}", title, favicon.is_some());

        Ok(PageMetadata { title, favicon })
    }
}

fn page_title(document: &Document) -> Option<String> {
    document
        .find(Name("title"))
        .next()
        .map(|n| n.text().trim().to_owned())
        .filter(|t| !t.is_empty())
}

/// Where the page's icon lives, resolved against the page URL.
///
/// `None` if the page URL is unusable.
fn icon_location(document: &Document, page_url: &str) -> Option<String> {
    let href = document
        .find(Name("link").and(Attr("rel", ())))
        .find(|n| {
            n.attr("rel")
                .is_some_and(|rel| rel.to_ascii_lowercase().contains("icon"))
        })
        .and_then(|n| n.attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty());

    if let Some(href) = href {
        if is_data_url(href) {
            return Some(href.to_string());
        }
    }

    let base = Url::parse(page_url).ok()?;
    let joined = base.join(href.unwrap_or("/favicon.ico")).ok()?;
    Some(joined.to_string())
}

fn encode_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Document {
        Document::from(html)
    }

    #[test]
    fn given_title_with_whitespace_when_parsed_then_trimmed() {
        let d = doc("<html><head><title>\n  Example Domain \n</title></head></html>");
        assert_eq!(page_title(&d), Some("Example Domain".to_string()));
    }

    #[test]
    fn given_missing_or_empty_title_when_parsed_then_none() {
        assert_eq!(page_title(&doc("<html><head></head></html>")), None);
        assert_eq!(page_title(&doc("<title>   </title>")), None);
    }

    #[test]
    fn given_relative_icon_when_located_then_resolved_against_page() {
        let d = doc(concat!(
            r#"<head><link rel="stylesheet" href="a.css">"#,
            r#"<link rel="shortcut icon" href="img/fav.png"></head>"#,
        ));
        assert_eq!(
            icon_location(&d, "https://example.com/docs/page.html"),
            Some("https://example.com/docs/img/fav.png".to_string())
        );
    }

    #[test]
    fn given_no_icon_link_when_located_then_origin_favicon() {
        let d = doc("<head><title>x</title></head>");
        assert_eq!(
            icon_location(&d, "http://example.com/a/b?q=1"),
            Some("http://example.com/favicon.ico".to_string())
        );
    }

    #[test]
    fn given_data_icon_when_located_then_passed_through() {
        let d = doc(r#"<link rel="icon" href="data:image/png;base64,AAAA">"#);
        assert_eq!(
            icon_location(&d, "not a url"),
            Some("data:image/png;base64,AAAA".to_string())
        );
    }

    #[test]
    fn given_unparsable_page_url_when_located_then_none() {
        assert_eq!(icon_location(&doc("<title>x</title>"), "::"), None);
    }

    #[test]
    fn given_bytes_when_encoded_then_base64_data_url() {
        assert_eq!(
            encode_data_url("image/png", b"hello"),
            "data:image/png;base64,aGVsbG8="
        );
    }
}
