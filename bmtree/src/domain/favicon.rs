// bmtree/src/domain/favicon.rs

pub type FaviconId = i32;

/// A cached icon in embeddable form, normally a `data:` URI.
/// Favicons are immutable and owned independently of the bookmarks referencing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favicon {
    pub id: FaviconId,
    pub data_url: String,
}

impl Favicon {
    /// Digest used by the favicon store to recognize an already stored payload.
    pub fn content_hash(data_url: &str) -> Vec<u8> {
        md5::compute(data_url).0.to_vec()
    }
}

/// True if the payload can be embedded into a page without another request.
pub fn is_data_url(payload: &str) -> bool {
    payload
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("data:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_same_payload_when_hashed_then_same_digest() {
        let a = Favicon::content_hash("data:image/png;base64,AAAA");
        let b = Favicon::content_hash("data:image/png;base64,AAAA");
        let c = Favicon::content_hash("data:image/png;base64,AAAB");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn given_payloads_when_is_data_url_then_only_data_scheme_matches() {
        assert!(is_data_url("data:image/x-icon;base64,AA=="));
        assert!(is_data_url("DATA:image/png,xyz"));
        assert!(!is_data_url("https://example.com/favicon.ico"));
        assert!(!is_data_url("dat"));
    }
}
