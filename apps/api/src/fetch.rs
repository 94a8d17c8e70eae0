//! Content Fetch Abstraction — two-tier page retrieval used by every extractor.
//!
//! Tier 1 is the Firecrawl managed-scraping API (JS-rendering-capable, slower).
//! Tier 2 is a direct GET with a browser-like user agent plus an HTML strip of
//! script/style/navigation markup. Tier 1 is skipped entirely when the scraping
//! capability is not configured.

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1/scrape";
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch returned status {0}")]
    Status(u16),
}

/// Normalized page content handed to the structuring layer.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Markdown-ish body text. Firecrawl returns real markdown; the raw path
    /// returns a stripped text digest.
    pub markdown: String,
    pub html: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlResponse {
    #[serde(default)]
    success: bool,
    data: Option<FirecrawlData>,
}

#[derive(Debug, Deserialize, Default)]
struct FirecrawlData {
    #[serde(default)]
    markdown: String,
    html: Option<String>,
    #[serde(default)]
    metadata: FirecrawlMetadata,
}

#[derive(Debug, Deserialize, Default)]
struct FirecrawlMetadata {
    title: Option<String>,
    description: Option<String>,
}

/// Thin wrapper over the Firecrawl scrape endpoint. All failures collapse to
/// `None` so the caller falls through to the raw path.
pub struct FirecrawlClient {
    client: Client,
    api_key: String,
}

impl FirecrawlClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(20))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    pub async fn scrape(&self, url: &str) -> Option<PageContent> {
        let url = ensure_https(url);
        let body = serde_json::json!({
            "url": url,
            "formats": ["markdown", "html"],
        });

        let response = match self
            .client
            .post(FIRECRAWL_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Firecrawl request failed for {url}: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Firecrawl returned status {} for {url}", response.status());
            return None;
        }

        let parsed: FirecrawlResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("Firecrawl response parse failed for {url}: {e}");
                return None;
            }
        };

        let data = match (parsed.success, parsed.data) {
            (true, Some(d)) => d,
            _ => return None,
        };
        if data.markdown.trim().is_empty() {
            return None;
        }

        Some(PageContent {
            markdown: data.markdown,
            html: data.html,
            title: data.metadata.title,
            description: data.metadata.description,
        })
    }
}

/// Two-tier fetcher shared by extractors and the agent's website tool.
pub struct ContentFetcher {
    firecrawl: Option<FirecrawlClient>,
    client: Client,
}

impl ContentFetcher {
    pub fn new(firecrawl: Option<FirecrawlClient>) -> Self {
        Self {
            firecrawl,
            client: Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    pub fn scraping_enabled(&self) -> bool {
        self.firecrawl.is_some()
    }

    /// Fetches normalized content: Firecrawl first when configured, raw
    /// GET + strip otherwise or on any Firecrawl failure.
    pub async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        let url = ensure_https(url);

        if let Some(firecrawl) = &self.firecrawl {
            if let Some(content) = firecrawl.scrape(&url).await {
                return Ok(content);
            }
        }

        let html = self.fetch_raw_html(&url).await?;
        let (body, title, description) = html_to_digest(&html);
        Ok(PageContent {
            markdown: body,
            html: Some(html),
            title,
            description,
        })
    }

    /// Managed-scraping tier only, no raw fallback. Used where the caller
    /// wants Firecrawl's rendered markdown but will fetch markup separately.
    pub async fn scrape_managed(&self, url: &str) -> Option<PageContent> {
        let firecrawl = self.firecrawl.as_ref()?;
        firecrawl.scrape(&ensure_https(url)).await
    }

    /// Raw HTML of a page, bypassing Firecrawl. Used where the extractor needs
    /// the markup itself (image harvesting, selector-based extraction).
    pub async fn fetch_raw_html(&self, url: &str) -> Result<String, FetchError> {
        let url = ensure_https(url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Coerces bare domains to secure-scheme URLs. Idempotent for already-prefixed
/// input; `http://` is left alone.
pub fn ensure_https(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Char-boundary-safe truncation applied before every AI call, since those
/// calls have fixed context budgets. Truncates, never fails.
pub fn truncate_chars(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        text.to_string()
    } else {
        text.chars().take(cap).collect()
    }
}

fn noise_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?is)<script\b.*?</script>|<style\b.*?</style>|<noscript\b.*?</noscript>|<nav\b.*?</nav>|<footer\b.*?</footer>|<header\b.*?</header>",
        )
        .expect("valid regex")
    })
}

/// Strips script/style/nav/footer/header blocks and extracts a line-per-element
/// text digest plus title and meta description.
pub fn html_to_digest(html: &str) -> (String, Option<String>, Option<String>) {
    let cleaned = noise_block_regex().replace_all(html, " ");
    let document = Html::parse_document(&cleaned);

    let title_selector = Selector::parse("title").expect("valid selector");
    let title = document
        .select(&title_selector)
        .next()
        .map(|t| clean_text(&t.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty());

    let meta_selector = Selector::parse(r#"meta[name="description"]"#).expect("valid selector");
    let description = document
        .select(&meta_selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    // Prefer the main content region when one exists.
    let body_text = ["main", "article", "body"]
        .iter()
        .find_map(|tag| {
            let selector = Selector::parse(tag).expect("valid selector");
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<Vec<_>>().join("\n"))
        })
        .unwrap_or_else(|| document.root_element().text().collect::<Vec<_>>().join("\n"));

    let digest = body_text
        .lines()
        .map(str::trim)
        .filter(|line| line.len() > 3)
        .collect::<Vec<_>>()
        .join("\n");

    (digest, title, description)
}

/// Collapses runs of whitespace into single spaces.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_https_prefixes_bare_domain() {
        assert_eq!(ensure_https("example.com"), "https://example.com");
    }

    #[test]
    fn test_ensure_https_keeps_existing_scheme() {
        assert_eq!(ensure_https("http://example.com"), "http://example.com");
        assert_eq!(ensure_https("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_truncate_chars_caps_length() {
        let long = "a".repeat(5000);
        assert_eq!(truncate_chars(&long, 100).len(), 100);
    }

    #[test]
    fn test_truncate_chars_is_boundary_safe() {
        // Multi-byte chars must not be split.
        let text = "héllo wörld".repeat(50);
        let truncated = truncate_chars(&text, 10);
        assert_eq!(truncated.chars().count(), 10);
    }

    #[test]
    fn test_truncate_chars_short_input_untouched() {
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_html_digest_strips_script_and_style() {
        let html = r#"<html><head><title> My Page </title>
            <meta name="description" content="A page.">
            <style>body { color: red; }</style></head>
            <body><script>var x = "secret";</script>
            <nav>Home About Contact</nav>
            <p>Visible paragraph content here.</p>
            <footer>copyright notice</footer></body></html>"#;
        let (digest, title, description) = html_to_digest(html);
        assert!(digest.contains("Visible paragraph content"));
        assert!(!digest.contains("secret"));
        assert!(!digest.contains("color: red"));
        assert!(!digest.contains("copyright"));
        assert_eq!(title.as_deref(), Some("My Page"));
        assert_eq!(description.as_deref(), Some("A page."));
    }

    #[test]
    fn test_html_digest_prefers_main_content() {
        let html = "<body><div>sidebar junk text</div><main><p>The real article body text.</p></main></body>";
        let (digest, _, _) = html_to_digest(html);
        assert!(digest.contains("real article body"));
        assert!(!digest.contains("sidebar junk"));
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  a \n b\t\tc  "), "a b c");
    }
}
