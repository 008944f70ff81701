// bmtree/src/domain/path.rs
//! Slash-delimited folder paths.
//!
//! Empty segments are dropped, so `""`, `"/"`, `"a//b"` and leading or trailing
//! slashes all normalize the same way. The empty path addresses the root.
use serde::Serialize;

pub const SEPARATOR: char = '/';

/// Non-empty segments of `path`, in order from the root.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Canonical form: a leading slash, single separators, no trailing slash ("/" for the root).
pub fn normalize(path: &str) -> String {
    format!("{}{}", SEPARATOR, segments(path).join("/"))
}

/// Appends one folder title to `path`.
pub fn join(path: &str, title: &str) -> String {
    let mut parts = segments(path);
    parts.extend(segments(title));
    format!("{}{}", SEPARATOR, parts.join("/"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub title: String,
    pub path: String,
}

/// One crumb per level from the root down to `path`.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut link = String::from("/");
    let mut crumbs = vec![Breadcrumb {
        title: "/".to_string(),
        path: link.clone(),
    }];
    for part in segments(path) {
        link.push_str(part);
        link.push(SEPARATOR);
        crumbs.push(Breadcrumb {
            title: format!("{}/", part),
            path: link.clone(),
        });
    }
    crumbs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("/", vec![])]
    #[case("a", vec!["a"])]
    #[case("/a//b/", vec!["a", "b"])]
    #[case("a/b", vec!["a", "b"])]
    #[case("///x///", vec!["x"])]
    fn given_path_when_segments_then_empty_parts_dropped(
        #[case] path: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(segments(path), expected);
    }

    #[rstest]
    #[case("", "/")]
    #[case("/", "/")]
    #[case("//", "/")]
    #[case("/a//b/", "/a/b")]
    #[case("a/b", "/a/b")]
    fn given_path_when_normalize_then_canonical(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(normalize(path), expected);
    }

    #[test]
    fn given_normalized_path_when_normalized_again_then_unchanged() {
        for p in ["", "/a", "a//b/c/", "/x/"] {
            let once = normalize(p);
            assert_eq!(normalize(&once), once);
            assert_eq!(segments(&once), segments(p));
        }
    }

    #[test]
    fn given_path_and_title_when_join_then_appended() {
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/a/", "b"), "/a/b");
        assert_eq!(join("", ""), "/");
    }

    #[test]
    fn given_nested_path_when_breadcrumbs_then_one_per_level() {
        let crumbs = breadcrumbs("/a//b/");
        let pairs: Vec<(&str, &str)> = crumbs
            .iter()
            .map(|c| (c.title.as_str(), c.path.as_str()))
            .collect();
        assert_eq!(pairs, vec![("/", "/"), ("a/", "/a/"), ("b/", "/a/b/")]);
    }

    #[test]
    fn given_root_when_breadcrumbs_then_single_crumb() {
        assert_eq!(breadcrumbs("").len(), 1);
        assert_eq!(breadcrumbs("/")[0].path, "/");
    }
}
