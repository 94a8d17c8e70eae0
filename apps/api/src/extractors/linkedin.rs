//! LinkedIn extractor — best-effort name/headline scrape.
//!
//! LinkedIn's markup changes frequently and most content sits behind auth, so
//! absent elements yield empty fields rather than errors. Only a failed
//! top-level fetch produces a `Failed` record.

use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::SourceRecord;
use crate::fetch::clean_text;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkedinProfile {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub about: String,
    pub experience: Vec<String>,
    pub education: Vec<String>,
}

pub async fn scrape_linkedin(http: &Client, url: &str) -> SourceRecord {
    let response = match http.get(url).send().await {
        Ok(r) => r,
        Err(e) => return SourceRecord::failed(format!("Error scraping LinkedIn: {e}")),
    };
    if !response.status().is_success() {
        return SourceRecord::failed(format!(
            "LinkedIn returned status {}",
            response.status().as_u16()
        ));
    }
    let html = match response.text().await {
        Ok(h) => h,
        Err(e) => return SourceRecord::failed(format!("Error scraping LinkedIn: {e}")),
    };

    SourceRecord::Linkedin(parse_profile(&html))
}

fn parse_profile(html: &str) -> LinkedinProfile {
    let document = Html::parse_document(html);

    let name_selectors = ["h1.text-heading-xlarge", "h1.top-card-layout__title"];
    let headline_selectors = [
        "div.text-body-medium",
        "h2.top-card-layout__headline",
        ".top-card-layout__second-subline",
    ];

    LinkedinProfile {
        name: find_text_by_selectors(&document, &name_selectors).unwrap_or_default(),
        headline: find_text_by_selectors(&document, &headline_selectors).unwrap_or_default(),
        ..Default::default()
    }
}

fn find_text_by_selectors(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_extracts_name_and_headline() {
        let html = r#"<html><body>
            <h1 class="text-heading-xlarge"> Jane Doe </h1>
            <div class="text-body-medium">Systems Engineer at Example Corp</div>
        </body></html>"#;
        let profile = parse_profile(html);
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.headline, "Systems Engineer at Example Corp");
    }

    #[test]
    fn test_parse_profile_missing_markup_yields_empty_fields() {
        let profile = parse_profile("<html><body><p>auth wall</p></body></html>");
        assert!(profile.name.is_empty());
        assert!(profile.headline.is_empty());
    }
}
