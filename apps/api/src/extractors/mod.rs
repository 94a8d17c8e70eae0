//! Source Extractors — one strategy per profile platform, each producing a
//! `SourceRecord` that is either populated or an error, never both.
//!
//! Failure policy shared by all extractors: a non-success status on the
//! primary page yields `SourceRecord::Failed`; failures in any sub-step
//! (README, project detail page, secondary platform page) degrade that one
//! field and continue.

pub mod devpost;
pub mod github;
pub mod kaggle;
pub mod linkedin;
pub mod prompts;
pub mod website;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::fetch::{ContentFetcher, BROWSER_USER_AGENT};
use crate::links::{record_key, Platform, ProfileLink};
use crate::structuring::Structurer;

/// Result of scraping and structuring one source-link. The enum makes the
/// populated-xor-error invariant structural: a `Failed` record carries only
/// its reason, and populated variants carry no error field at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceRecord {
    Github(github::GithubProfile),
    Linkedin(linkedin::LinkedinProfile),
    Devpost(devpost::DevpostProfile),
    Kaggle(kaggle::KaggleProfile),
    Website(website::WebsiteSummary),
    Failed { error: String },
}

impl SourceRecord {
    pub fn failed(error: impl Into<String>) -> Self {
        SourceRecord::Failed {
            error: error.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SourceRecord::Failed { .. })
    }
}

/// The extractor set shared via `AppState`: one browser-like HTTP client for
/// direct platform calls, the two-tier fetcher, and the structuring layer.
#[derive(Clone)]
pub struct Extractors {
    pub http: Client,
    pub fetcher: Arc<ContentFetcher>,
    pub structurer: Structurer,
}

impl Extractors {
    pub fn new(fetcher: Arc<ContentFetcher>, structurer: Structurer) -> Self {
        Self {
            http: Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
            fetcher,
            structurer,
        }
    }

    /// Sequentially scrapes every classified link. One record per link; a
    /// failed platform lands in the map as `Failed` and never aborts the rest.
    pub async fn scrape_all(&self, links: &[ProfileLink]) -> BTreeMap<String, SourceRecord> {
        let mut records = BTreeMap::new();
        for link in links {
            let key = record_key(link);
            info!("scraping {} ({key})", link.raw);
            let record = match link.platform {
                Platform::Github => {
                    let username = link.identifier.as_deref().unwrap_or_default();
                    github::scrape_github(&self.http, username).await
                }
                Platform::Linkedin => {
                    let url = link.url.as_deref().unwrap_or(&link.raw);
                    linkedin::scrape_linkedin(&self.http, url).await
                }
                Platform::Devpost => {
                    let username = link.identifier.as_deref().unwrap_or_default();
                    devpost::scrape_devpost(self, username).await
                }
                Platform::Kaggle => {
                    let username = link.identifier.as_deref().unwrap_or_default();
                    kaggle::scrape_kaggle(self, username).await
                }
                Platform::Unknown => {
                    let url = link.url.as_deref().unwrap_or(&link.raw);
                    website::scrape_website(self, url).await
                }
            };
            records.insert(key, record);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record_roundtrips_with_kind_tag() {
        let record = SourceRecord::failed("GitHub API returned status 404");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"kind\":\"failed\""));
        let back: SourceRecord = serde_json::from_str(&json).unwrap();
        assert!(back.is_failed());
    }

    #[test]
    fn test_populated_record_has_no_error_field() {
        let record = SourceRecord::Linkedin(linkedin::LinkedinProfile {
            name: "Jane Doe".to_string(),
            ..Default::default()
        });
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["kind"], "linkedin");
        assert!(!record.is_failed());
    }
}
