//! Link classification — turns submitted URLs into `{platform, identifier}`
//! pairs, plus the URL and storage-key utilities shared across the service.
//!
//! Classification is a pure function: the same input always yields the same
//! `ProfileLink`, which makes it cheap to test exhaustively.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::fetch::ensure_https;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Github,
    Linkedin,
    Devpost,
    Kaggle,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Linkedin => "linkedin",
            Platform::Devpost => "devpost",
            Platform::Kaggle => "kaggle",
            Platform::Unknown => "unknown",
        }
    }
}

/// A submitted source-link after classification. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileLink {
    pub raw: String,
    pub platform: Platform,
    /// Platform-specific username/slug; absent for unknown sites.
    pub identifier: Option<String>,
    /// Normalized URL; retained for linkedin (scraped by URL) and unknown
    /// sites (the identifier concept does not apply).
    pub url: Option<String>,
}

fn github_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"github\.com/([^/?#]+)").expect("valid regex"))
}

fn linkedin_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"linkedin\.com/in/([^/?#]+)").expect("valid regex"))
}

fn devpost_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"devpost\.com/([^/?#]+)").expect("valid regex"))
}

fn kaggle_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"kaggle\.com/([^/?#]+)").expect("valid regex"))
}

/// Classifies one submitted link. Returns `None` for strings that are not
/// URL-shaped at all (no dot, no recognizable host path).
pub fn classify(link: &str) -> Option<ProfileLink> {
    let raw = link.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.contains("github.com") {
        let identifier = github_regex().captures(raw)?.get(1)?.as_str().to_string();
        return Some(ProfileLink {
            raw: raw.to_string(),
            platform: Platform::Github,
            identifier: Some(identifier),
            url: None,
        });
    }
    if raw.contains("linkedin.com") {
        let identifier = linkedin_regex().captures(raw)?.get(1)?.as_str().to_string();
        return Some(ProfileLink {
            raw: raw.to_string(),
            platform: Platform::Linkedin,
            identifier: Some(identifier),
            url: Some(ensure_https(raw)),
        });
    }
    if raw.contains("devpost.com") {
        let identifier = devpost_regex().captures(raw)?.get(1)?.as_str().to_string();
        return Some(ProfileLink {
            raw: raw.to_string(),
            platform: Platform::Devpost,
            identifier: Some(identifier),
            url: None,
        });
    }
    if raw.contains("kaggle.com") {
        let identifier = kaggle_regex().captures(raw)?.get(1)?.as_str().to_string();
        return Some(ProfileLink {
            raw: raw.to_string(),
            platform: Platform::Kaggle,
            identifier: Some(identifier),
            url: None,
        });
    }

    // Any unrecognized but well-formed domain is an unknown website.
    if raw.contains('.') {
        return Some(ProfileLink {
            raw: raw.to_string(),
            platform: Platform::Unknown,
            identifier: None,
            url: Some(ensure_https(raw)),
        });
    }

    None
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+[^\s<>"{}|\\^`\[\].,;:!?]"#)
            .expect("valid regex")
    })
}

/// All URLs embedded in free text, deduplicated, order of first appearance.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    url_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Derives the storage key for a person's bundle from their display name.
/// Deterministic: filesystem-hostile characters become underscores, length is
/// capped at 100, and empty/unusable names map to the `unknown` sentinel.
pub fn sanitize_storage_key(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .collect();
    let trimmed = sanitized.trim();
    let capped: String = trimmed.chars().take(100).collect();
    // "." and ".." are path traversals, not names.
    if capped.is_empty() || capped == "." || capped == ".." {
        "unknown".to_string()
    } else {
        capped
    }
}

/// Platform key used in the source-record map: platform name, or the sanitized
/// domain for unknown websites.
pub fn record_key(link: &ProfileLink) -> String {
    match link.platform {
        Platform::Unknown => {
            let url = link.url.as_deref().unwrap_or(&link.raw);
            let domain = url
                .split('/')
                .nth(2)
                .filter(|d| !d.is_empty())
                .unwrap_or("website");
            domain.replace(['.', '-'], "_")
        }
        platform => platform.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_github_extracts_username() {
        let link = classify("https://github.com/janedoe").unwrap();
        assert_eq!(link.platform, Platform::Github);
        assert_eq!(link.identifier.as_deref(), Some("janedoe"));
    }

    #[test]
    fn test_classify_github_strips_trailing_path() {
        let link = classify("https://github.com/janedoe/some-repo").unwrap();
        assert_eq!(link.identifier.as_deref(), Some("janedoe"));
    }

    #[test]
    fn test_classify_kaggle_strips_query_string() {
        let link = classify("https://kaggle.com/someuser?tab=datasets").unwrap();
        assert_eq!(link.platform, Platform::Kaggle);
        assert_eq!(link.identifier.as_deref(), Some("someuser"));
    }

    #[test]
    fn test_classify_linkedin_keeps_url() {
        let link = classify("https://www.linkedin.com/in/jane-doe-123/").unwrap();
        assert_eq!(link.platform, Platform::Linkedin);
        assert_eq!(link.identifier.as_deref(), Some("jane-doe-123"));
        assert!(link.url.unwrap().contains("linkedin.com/in/jane-doe-123"));
    }

    #[test]
    fn test_classify_devpost() {
        let link = classify("https://devpost.com/someone?ref=portfolio").unwrap();
        assert_eq!(link.platform, Platform::Devpost);
        assert_eq!(link.identifier.as_deref(), Some("someone"));
    }

    #[test]
    fn test_classify_unknown_domain_is_normalized() {
        let link = classify("myportfolio.dev").unwrap();
        assert_eq!(link.platform, Platform::Unknown);
        assert!(link.identifier.is_none());
        assert_eq!(link.url.as_deref(), Some("https://myportfolio.dev"));
    }

    #[test]
    fn test_classify_is_pure() {
        let a = classify("https://kaggle.com/someuser?tab=datasets");
        let b = classify("https://kaggle.com/someuser?tab=datasets");
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_rejects_non_urls() {
        assert!(classify("not a url").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_extract_urls_dedupes_preserving_order() {
        let text = "See https://github.com/jane and https://example.com/x then https://github.com/jane again";
        let urls = extract_urls(text);
        assert_eq!(
            urls,
            vec![
                "https://github.com/jane".to_string(),
                "https://example.com/x".to_string()
            ]
        );
    }

    #[test]
    fn test_extract_urls_drops_trailing_punctuation() {
        let urls = extract_urls("Visit https://example.com/page.");
        assert_eq!(urls, vec!["https://example.com/page".to_string()]);
    }

    #[test]
    fn test_sanitize_storage_key_replaces_invalid_chars() {
        assert_eq!(sanitize_storage_key("Jane/Doe: CV?"), "Jane_Doe_ CV_");
    }

    #[test]
    fn test_sanitize_storage_key_empty_maps_to_sentinel() {
        assert_eq!(sanitize_storage_key(""), "unknown");
        assert_eq!(sanitize_storage_key("   "), "unknown");
    }

    #[test]
    fn test_sanitize_storage_key_rejects_path_traversal() {
        assert_eq!(sanitize_storage_key(".."), "unknown");
        assert_eq!(sanitize_storage_key("."), "unknown");
        assert_eq!(sanitize_storage_key(" .. "), "unknown");
    }

    #[test]
    fn test_sanitize_storage_key_caps_length() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_storage_key(&long).len(), 100);
    }

    #[test]
    fn test_record_key_uses_domain_for_unknown() {
        let link = classify("https://my-site.example.org/about").unwrap();
        assert_eq!(record_key(&link), "my_site_example_org");
    }

    #[test]
    fn test_record_key_uses_platform_name() {
        let link = classify("https://github.com/janedoe").unwrap();
        assert_eq!(record_key(&link), "github");
    }
}
