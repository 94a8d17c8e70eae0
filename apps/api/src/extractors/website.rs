//! Generic website extractor for links that match no known platform:
//! fetch, digest, then a classify-and-summarize structuring call.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::prompts::WEBSITE_ANALYZE_TEMPLATE;
use super::{Extractors, SourceRecord};
use crate::fetch::truncate_chars;
use crate::structuring::Structured;

const DIGEST_CAP: usize = 15000;
const PREVIEW_CAP: usize = 2000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MentionedProject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub social_links: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebsiteSummary {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub page_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub technologies_mentioned: Vec<String>,
    #[serde(default)]
    pub skills_demonstrated: Vec<String>,
    #[serde(default)]
    pub projects_mentioned: Vec<MentionedProject>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub main_content: String,
    #[serde(default)]
    pub professional_relevance: String,
    /// Content preview carried only on the structuring-failure path.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_preview: String,
}

pub async fn scrape_website(ext: &Extractors, url: &str) -> SourceRecord {
    let content = match ext.fetcher.fetch(url).await {
        Ok(c) => c,
        Err(e) => return SourceRecord::failed(format!("Error scraping website: {e}")),
    };

    let digest = truncate_chars(&content.markdown, DIGEST_CAP);
    let prompt = WEBSITE_ANALYZE_TEMPLATE
        .replace("{url}", url)
        .replace("{page_title}", content.title.as_deref().unwrap_or(""))
        .replace(
            "{meta_description}",
            content.description.as_deref().unwrap_or(""),
        )
        .replace("{page_text}", &digest);

    match ext.structurer.object::<WebsiteSummary>(&prompt).await {
        Structured::Parsed(mut summary) => {
            summary.url = url.to_string();
            SourceRecord::Website(summary)
        }
        Structured::Raw(_) => {
            warn!("website structuring failed for {url}, using preview envelope");
            SourceRecord::Website(WebsiteSummary {
                url: url.to_string(),
                page_type: "Unknown".to_string(),
                summary: content.title.clone().unwrap_or_default(),
                content_preview: truncate_chars(&digest, PREVIEW_CAP),
                ..Default::default()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_tolerates_partial_json() {
        let json = r#"{"page_type":"Portfolio","summary":"A personal site.","key_topics":["rust"]}"#;
        let summary: WebsiteSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.page_type, "Portfolio");
        assert!(summary.contact_info.email.is_empty());
        assert!(summary.projects_mentioned.is_empty());
    }

    #[test]
    fn test_preview_field_omitted_when_empty() {
        let summary = WebsiteSummary {
            url: "https://example.com".into(),
            page_type: "Blog".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("content_preview").is_none());
    }
}
