//! GitHub extractor — public REST API for profile plus recent repositories,
//! with README content as the per-repo description enrichment.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SourceRecord;

const API_BASE: &str = "https://api.github.com";
/// Most-recently-updated repositories fetched per profile.
const MAX_REPOS: usize = 10;
/// README extract length folded into `detailed_description`.
const README_CAP: usize = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoRecord {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub forks: u64,
    pub url: String,
    pub topics: Vec<String>,
    /// First portion of the README, or empty when unavailable.
    pub detailed_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubProfile {
    pub name: String,
    pub bio: String,
    pub location: String,
    pub company: String,
    pub blog: String,
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub repositories: Vec<RepoRecord>,
}

#[derive(Debug, Deserialize)]
struct UserApi {
    name: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    company: Option<String>,
    blog: Option<String>,
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    following: u64,
}

#[derive(Debug, Deserialize)]
struct RepoApi {
    #[serde(default)]
    name: String,
    #[serde(default)]
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    topics: Vec<String>,
    homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadmeApi {
    #[serde(default)]
    content: String,
}

/// Scrapes a GitHub profile. Only the top-level user fetch can fail the
/// record; everything below it degrades per-field.
pub async fn scrape_github(http: &Client, username: &str) -> SourceRecord {
    let user_url = format!("{API_BASE}/users/{username}");
    let response = match http.get(&user_url).send().await {
        Ok(r) => r,
        Err(e) => return SourceRecord::failed(format!("Error scraping GitHub: {e}")),
    };
    if !response.status().is_success() {
        return SourceRecord::failed(format!(
            "GitHub API returned status {}",
            response.status().as_u16()
        ));
    }
    let user: UserApi = match response.json().await {
        Ok(u) => u,
        Err(e) => return SourceRecord::failed(format!("Error scraping GitHub: {e}")),
    };

    let repos = fetch_repos(http, username).await;
    let mut repositories = Vec::with_capacity(repos.len());
    for repo in repos.into_iter().take(MAX_REPOS) {
        repositories.push(build_repo_record(http, repo).await);
    }

    SourceRecord::Github(GithubProfile {
        name: user.name.unwrap_or_default(),
        bio: user.bio.unwrap_or_default(),
        location: user.location.unwrap_or_default(),
        company: user.company.unwrap_or_default(),
        blog: user.blog.unwrap_or_default(),
        public_repos: user.public_repos,
        followers: user.followers,
        following: user.following,
        repositories,
    })
}

async fn fetch_repos(http: &Client, username: &str) -> Vec<RepoApi> {
    let repos_url = format!("{API_BASE}/users/{username}/repos?sort=updated&per_page={MAX_REPOS}");
    match http.get(&repos_url).send().await {
        Ok(r) if r.status().is_success() => r.json().await.unwrap_or_default(),
        Ok(r) => {
            debug!("repo listing returned status {}", r.status());
            Vec::new()
        }
        Err(e) => {
            debug!("repo listing failed: {e}");
            Vec::new()
        }
    }
}

/// Builds one repo record, enriching with the README or, failing that, the
/// repo-detail homepage/description. Never fails: enrichment misses leave the
/// affected fields empty.
async fn build_repo_record(http: &Client, repo: RepoApi) -> RepoRecord {
    let mut record = RepoRecord {
        name: repo.name,
        full_name: repo.full_name,
        description: repo.description.unwrap_or_default(),
        language: repo.language.unwrap_or_default(),
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        url: repo.html_url,
        topics: repo.topics,
        detailed_description: String::new(),
        homepage: repo.homepage.filter(|h| !h.is_empty()),
    };

    match fetch_readme(http, &record.full_name).await {
        Some(readme) => record.detailed_description = readme,
        None => enrich_from_repo_detail(http, &mut record).await,
    }

    record
}

async fn fetch_readme(http: &Client, full_name: &str) -> Option<String> {
    let readme_url = format!("{API_BASE}/repos/{full_name}/readme");
    let response = http.get(&readme_url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let readme: ReadmeApi = response.json().await.ok()?;
    let decoded = BASE64
        .decode(readme.content.replace(['\n', '\r'], ""))
        .ok()?;
    let text = String::from_utf8_lossy(&decoded);
    Some(extract_readme_preview(&text))
}

fn extract_readme_preview(readme: &str) -> String {
    if readme.chars().count() > README_CAP {
        let preview: String = readme.chars().take(README_CAP).collect();
        format!("{preview}...")
    } else {
        readme.to_string()
    }
}

/// Fallback enrichment when the README fetch misses: take homepage and
/// description from the repo-detail endpoint without clobbering existing
/// values.
async fn enrich_from_repo_detail(http: &Client, record: &mut RepoRecord) {
    let detail_url = format!("{API_BASE}/repos/{}", record.full_name);
    let Ok(response) = http.get(&detail_url).send().await else {
        return;
    };
    if !response.status().is_success() {
        return;
    }
    let Ok(detail) = response.json::<RepoApi>().await else {
        return;
    };
    if record.homepage.is_none() {
        record.homepage = detail.homepage.filter(|h| !h.is_empty());
    }
    if record.description.is_empty() {
        if let Some(description) = detail.description {
            record.description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readme_preview_caps_at_1000_with_ellipsis() {
        let readme = "x".repeat(5000);
        let preview = extract_readme_preview(&readme);
        assert_eq!(preview.chars().count(), README_CAP + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_readme_preview_short_readme_untouched() {
        assert_eq!(extract_readme_preview("# Hello"), "# Hello");
    }

    #[test]
    fn test_repo_api_tolerates_nulls() {
        let json = r#"{"name":"r","full_name":"u/r","description":null,"language":null,
            "stargazers_count":3,"forks_count":1,"html_url":"https://github.com/u/r",
            "topics":["cli"],"homepage":null}"#;
        let repo: RepoApi = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "r");
        assert!(repo.description.is_none());
        assert_eq!(repo.topics, vec!["cli"]);
    }

    #[test]
    fn test_profile_serializes_repo_cap_shape() {
        let profile = GithubProfile {
            name: "Jane".into(),
            repositories: vec![RepoRecord::default(); 3],
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["repositories"].as_array().unwrap().len(), 3);
        // homepage is omitted when absent
        assert!(json["repositories"][0].get("homepage").is_none());
    }
}
