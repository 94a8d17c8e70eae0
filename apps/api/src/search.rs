//! Web-search collaborator: a best-effort scrape of the Google result page.
//! Errors collapse to an empty list; callers treat "no results" and "search
//! failed" the same way.

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

pub async fn search_web(client: &Client, query: &str, max_results: usize) -> Vec<String> {
    let request = client
        .get("https://www.google.com/search")
        .query(&[("q", query), ("num", &max_results.to_string())]);

    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => {
            debug!("web search request failed: {e}");
            return Vec::new();
        }
    };
    if !response.status().is_success() {
        debug!("web search returned status {}", response.status());
        return Vec::new();
    }
    let html = match response.text().await {
        Ok(h) => h,
        Err(e) => {
            debug!("web search body read failed: {e}");
            return Vec::new();
        }
    };

    parse_result_links(&html, max_results)
}

/// Result hrefs come wrapped as `/url?q=<target>&...`; unwrap, drop Google's
/// own domains, dedup preserving rank order.
fn parse_result_links(html: &str, max_results: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").expect("valid selector");

    let mut results = Vec::new();
    for link in document.select(&link_selector) {
        let href = link.value().attr("href").unwrap_or_default();
        let Some(wrapped) = href.strip_prefix("/url?q=") else {
            continue;
        };
        let target = wrapped.split('&').next().unwrap_or_default();
        let target = urldecode(target);
        if target.is_empty()
            || target.contains("google.com")
            || !target.starts_with("http")
            || results.contains(&target)
        {
            continue;
        }
        results.push(target);
        if results.len() >= max_results {
            break;
        }
    }
    results
}

/// Percent-decoding for the `q=` value inside Google's wrapped hrefs.
fn urldecode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                // Hex digits are ASCII; anything else (including a multibyte
                // char right after the '%') keeps the '%' literal.
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .and_then(|pair| std::str::from_utf8(pair).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match escaped {
                    Some(byte) => {
                        decoded.push(byte);
                        i += 3;
                    }
                    None => {
                        decoded.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_result_links_unwraps_and_dedupes() {
        let html = r#"<html><body>
            <a href="/url?q=https://example.com/paper&sa=U">result</a>
            <a href="/url?q=https://example.com/paper&sa=U">same result</a>
            <a href="/url?q=https://maps.google.com/x&sa=U">google internal</a>
            <a href="/url?q=https://other.org/page&sa=U">second</a>
            <a href="https://direct.example.com">not wrapped</a>
        </body></html>"#;
        let results = parse_result_links(html, 5);
        assert_eq!(
            results,
            vec![
                "https://example.com/paper".to_string(),
                "https://other.org/page".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_result_links_honors_cap() {
        let html = r#"<html><body>
            <a href="/url?q=https://a.com&sa=U">a</a>
            <a href="/url?q=https://b.com&sa=U">b</a>
            <a href="/url?q=https://c.com&sa=U">c</a>
        </body></html>"#;
        assert_eq!(parse_result_links(html, 2).len(), 2);
    }

    #[test]
    fn test_urldecode_escapes() {
        assert_eq!(urldecode("https%3A%2F%2Fa.com%2Fx+y"), "https://a.com/x y");
    }

    #[test]
    fn test_urldecode_keeps_malformed_escapes_literal() {
        assert_eq!(urldecode("%中文"), "%中文");
        assert_eq!(urldecode("100%zz"), "100%zz");
        assert_eq!(urldecode("trailing%2"), "trailing%2");
        assert_eq!(urldecode("trailing%"), "trailing%");
    }
}
