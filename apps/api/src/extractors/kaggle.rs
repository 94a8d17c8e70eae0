//! Kaggle extractor — profile, code, and datasets pages structured
//! independently. One page failing never blocks the others; even all three
//! failing yields a populated-but-empty record rather than `Failed`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::{KAGGLE_CODE_TEMPLATE, KAGGLE_DATASETS_TEMPLATE, KAGGLE_PROFILE_TEMPLATE};
use super::{Extractors, SourceRecord};
use crate::fetch::truncate_chars;
use crate::structuring::Structured;

/// Per-page digest cap before the structuring call.
const PAGE_CAP: usize = 5000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedalCounts {
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetitionStanding {
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub medals: MedalCounts,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierStanding {
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KaggleOverview {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub competitions: CompetitionStanding,
    #[serde(default)]
    pub datasets: TierStanding,
    #[serde(default)]
    pub notebooks: TierStanding,
    #[serde(default)]
    pub discussion: TierStanding,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub votes: u32,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub last_run: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub files: u32,
    #[serde(default)]
    pub downloads: u32,
    #[serde(default)]
    pub votes: u32,
    #[serde(default)]
    pub usability: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KaggleProfile {
    #[serde(default)]
    pub profile: KaggleOverview,
    #[serde(default)]
    pub notebooks: Vec<NotebookRecord>,
    #[serde(default)]
    pub datasets: Vec<DatasetRecord>,
}

pub async fn scrape_kaggle(ext: &Extractors, username: &str) -> SourceRecord {
    let base = format!("https://www.kaggle.com/{username}");

    let profile = match fetch_page_text(ext, &base).await {
        Some(text) => {
            let prompt = KAGGLE_PROFILE_TEMPLATE.replace("{page_text}", &text);
            match ext.structurer.object::<KaggleOverview>(&prompt).await {
                Structured::Parsed(overview) => overview,
                Structured::Raw(_) => KaggleOverview::default(),
            }
        }
        None => KaggleOverview::default(),
    };

    let notebooks = match fetch_page_text(ext, &format!("{base}/code")).await {
        Some(text) => {
            let prompt = KAGGLE_CODE_TEMPLATE.replace("{page_text}", &text);
            ext.structurer.array::<NotebookRecord>(&prompt).await
        }
        None => Vec::new(),
    };

    let datasets = match fetch_page_text(ext, &format!("{base}/datasets")).await {
        Some(text) => {
            let prompt = KAGGLE_DATASETS_TEMPLATE.replace("{page_text}", &text);
            ext.structurer.array::<DatasetRecord>(&prompt).await
        }
        None => Vec::new(),
    };

    SourceRecord::Kaggle(KaggleProfile {
        profile,
        notebooks,
        datasets,
    })
}

async fn fetch_page_text(ext: &Extractors, url: &str) -> Option<String> {
    match ext.fetcher.fetch(url).await {
        Ok(content) if !content.markdown.trim().is_empty() => {
            Some(truncate_chars(&content.markdown, PAGE_CAP))
        }
        Ok(_) => {
            debug!("Kaggle page {url} returned no usable content");
            None
        }
        Err(e) => {
            debug!("Kaggle page fetch failed for {url}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_tolerates_missing_sections() {
        let json = r#"{"name":"Jane Doe","competitions":{"tier":"Expert","total":4}}"#;
        let overview: KaggleOverview = serde_json::from_str(json).unwrap();
        assert_eq!(overview.name, "Jane Doe");
        assert_eq!(overview.competitions.tier, "Expert");
        assert_eq!(overview.competitions.medals.gold, 0);
        assert!(overview.datasets.tier.is_empty());
    }

    #[test]
    fn test_profile_with_all_empty_parts_still_serializes() {
        let profile = KaggleProfile::default();
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["notebooks"].as_array().unwrap().is_empty());
        assert!(json["datasets"].as_array().unwrap().is_empty());
        assert_eq!(json["profile"]["followers"], 0);
    }

    #[test]
    fn test_dataset_record_usability_is_fractional() {
        let json = r#"{"title":"Births","usability":0.88}"#;
        let record: DatasetRecord = serde_json::from_str(json).unwrap();
        assert!((record.usability - 0.88).abs() < f64::EPSILON);
    }
}
