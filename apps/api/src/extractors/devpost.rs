//! DevPost extractor — the densest strategy.
//!
//! Pipeline: fetch the profile page, harvest project-card links and thumbnail
//! images from the markup, structure the page text through the AI with an
//! image-URL hint, then attach images to the structured projects by three
//! ordered strategies and enrich the top projects from their detail pages.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::prompts::DEVPOST_STRUCTURE_TEMPLATE;
use super::{Extractors, SourceRecord};
use crate::fetch::{html_to_digest, truncate_chars};
use crate::structuring::Structured;

const DIGEST_CAP: usize = 8000;
const FALLBACK_RAW_CAP: usize = 2000;
const DESCRIPTION_CAP: usize = 2000;
/// Individual project detail pages fetched in the enrichment pass.
const MAX_PROJECT_PAGES: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub youtube_links: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub built_with: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_members: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DevpostStats {
    #[serde(default)]
    pub projects: u32,
    #[serde(default)]
    pub hackathons: u32,
    #[serde(default)]
    pub achievements: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevpostProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub stats: DevpostStats,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    /// Populated only on the structuring-failure fallback path.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_text: String,
}

/// A project card harvested from the profile markup: a thumbnail plus whatever
/// identifying context sat near it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectCard {
    pub image_url: String,
    pub slug: Option<String>,
    pub name: Option<String>,
}

/// Detail-page fields merged into an already-structured project.
#[derive(Debug, Clone, Default)]
struct ProjectDetails {
    youtube_links: Vec<String>,
    full_description: String,
    built_with: Vec<String>,
    team_members: Vec<String>,
    screenshots: Vec<String>,
}

pub async fn scrape_devpost(ext: &Extractors, username: &str) -> SourceRecord {
    let url = format!("https://devpost.com/{username}");

    // Firecrawl gives a better text digest, but image harvesting always needs
    // the real markup, so the direct fetch happens regardless.
    let managed = ext.fetcher.scrape_managed(&url).await;

    let response = match ext.http.get(&url).send().await {
        Ok(r) => r,
        Err(e) => return SourceRecord::failed(format!("Error scraping DevPost: {e}")),
    };
    if !response.status().is_success() {
        return SourceRecord::failed(format!(
            "DevPost returned status {}",
            response.status().as_u16()
        ));
    }
    let html = match response.text().await {
        Ok(h) => h,
        Err(e) => return SourceRecord::failed(format!("Error scraping DevPost: {e}")),
    };

    let (cards, project_urls) = harvest_project_cards(&html);
    debug!(
        "harvested {} project cards, {} detail urls",
        cards.len(),
        project_urls.len()
    );

    let digest = match managed {
        Some(content) if !content.markdown.trim().is_empty() => {
            truncate_chars(&content.markdown, DIGEST_CAP)
        }
        _ => truncate_chars(&html_to_digest(&html).0, DIGEST_CAP),
    };

    let image_info = if cards.is_empty() {
        "No project images were found on the page.".to_string()
    } else {
        let urls: Vec<&str> = cards.iter().take(10).map(|c| c.image_url.as_str()).collect();
        format!(
            "Found {} project images. Image URLs: {}",
            cards.len(),
            urls.join(", ")
        )
    };

    let prompt = DEVPOST_STRUCTURE_TEMPLATE
        .replace("{page_text}", &digest)
        .replace("{image_info}", &image_info);

    match ext.structurer.object::<DevpostProfile>(&prompt).await {
        Structured::Parsed(mut profile) => {
            assign_project_images(&mut profile.projects, &cards);
            enrich_top_projects(ext, &mut profile.projects, &project_urls).await;
            SourceRecord::Devpost(profile)
        }
        Structured::Raw(_) => {
            warn!("DevPost structuring failed for {username}, using fallback profile");
            SourceRecord::Devpost(fallback_profile(&html, &digest))
        }
    }
}

/// Harvests project thumbnails by two independent heuristics: images inside
/// `/software/` links, then images inside project-ish containers. Returns the
/// deduplicated cards plus the ordered detail-page URLs.
pub fn harvest_project_cards(html: &str) -> (Vec<ProjectCard>, Vec<String>) {
    let document = Html::parse_document(html);
    let mut cards: Vec<ProjectCard> = Vec::new();
    let mut seen_images = HashSet::new();
    let mut project_urls: Vec<String> = Vec::new();

    let link_selector = Selector::parse("a").expect("valid selector");
    let img_selector = Selector::parse("img").expect("valid selector");
    let name_selector = Selector::parse("h5, h4, h3, h2").expect("valid selector");

    // Heuristic 1: link -> image adjacency on /software/ links.
    for link in document.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains("/software/") {
            continue;
        }

        let detail_url = absolutize(href);
        if !project_urls.contains(&detail_url) {
            project_urls.push(detail_url);
        }

        let Some(img) = link.select(&img_selector).next() else {
            continue;
        };
        let Some(src) = image_source(&img) else {
            continue;
        };
        let image_url = absolutize(&src);
        if !seen_images.insert(image_url.clone()) {
            continue;
        }

        let slug = href.rsplit('/').next().map(str::to_string);
        let name = link
            .select(&name_selector)
            .next()
            .map(|el| crate::fetch::clean_text(&el.text().collect::<Vec<_>>().join(" ")))
            .filter(|t| !t.is_empty())
            .or_else(|| img.value().attr("alt").map(str::to_string))
            .filter(|t| !t.is_empty());

        cards.push(ProjectCard { image_url, slug, name });
    }

    // Heuristic 2: images inside containers whose class looks project-shaped.
    let container_selector = Selector::parse("div, article, section").expect("valid selector");
    for container in document.select(&container_selector) {
        if !class_contains(&container, &["software", "project", "entry", "card"]) {
            continue;
        }
        let inner_link = container
            .select(&link_selector)
            .find(|a| a.value().attr("href").is_some_and(|h| h.contains("/software/")));

        for img in container.select(&img_selector) {
            let Some(src) = image_source(&img) else {
                continue;
            };
            let relevant = inner_link.is_some()
                || src.to_lowercase().contains("software")
                || src.to_lowercase().contains("project");
            if !relevant {
                continue;
            }
            let image_url = absolutize(&src);
            if !seen_images.insert(image_url.clone()) {
                continue;
            }
            let slug = inner_link
                .and_then(|a| a.value().attr("href"))
                .and_then(|h| h.rsplit('/').next())
                .map(str::to_string);
            cards.push(ProjectCard {
                image_url,
                slug,
                name: img.value().attr("alt").map(str::to_string).filter(|a| !a.is_empty()),
            });
        }
    }

    (cards, project_urls)
}

fn image_source(img: &ElementRef<'_>) -> Option<String> {
    for attr in ["src", "data-src", "data-original", "data-lazy-src"] {
        if let Some(value) = img.value().attr(attr) {
            if !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

fn class_contains(el: &ElementRef<'_>, needles: &[&str]) -> bool {
    el.value()
        .attr("class")
        .map(|classes| {
            let classes = classes.to_lowercase();
            needles.iter().any(|needle| classes.contains(needle))
        })
        .unwrap_or(false)
}

fn absolutize(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else if url.starts_with('/') {
        format!("https://devpost.com{url}")
    } else if !url.starts_with("http") {
        format!("https://devpost.com/{url}")
    } else {
        url.to_string()
    }
}

/// Attaches thumbnails to structured projects. Strategy order is fixed:
/// (1) name/slug textual similarity, (2) positional index, (3) any remaining
/// unused image in leftover order; then an index-based sweep so no project
/// goes imageless while images remain.
pub fn assign_project_images(projects: &mut [ProjectRecord], cards: &[ProjectCard]) {
    let mut used: HashSet<String> = HashSet::new();

    for (idx, project) in projects.iter_mut().enumerate() {
        let project_name = project.name.to_lowercase().trim().to_string();
        let mut matched = false;

        // Strategy 1: name/slug similarity.
        if !project_name.is_empty() {
            for card in cards {
                if used.contains(&card.image_url) {
                    continue;
                }
                let img_name = card.name.as_deref().unwrap_or("").to_lowercase();
                let img_slug = card.slug.as_deref().unwrap_or("").to_lowercase();

                let name_match = !img_name.is_empty()
                    && (project_name.contains(&img_name)
                        || img_name.contains(&project_name)
                        || img_name.contains(&prefix15(&project_name))
                        || project_name.contains(&prefix15(&img_name)));
                let slug_match =
                    !img_slug.is_empty() && img_slug.contains(&project_name.replace(' ', "-"));

                if name_match || slug_match {
                    project.image_url = Some(card.image_url.clone());
                    used.insert(card.image_url.clone());
                    matched = true;
                    break;
                }
            }
        }

        // Strategy 2: positional index correspondence.
        if !matched {
            if let Some(card) = cards.get(idx) {
                if !used.contains(&card.image_url) {
                    project.image_url = Some(card.image_url.clone());
                    used.insert(card.image_url.clone());
                    matched = true;
                }
            }
        }

        // Strategy 3: any remaining unused image, leftover order.
        if !matched {
            if let Some(card) = cards.iter().find(|c| !used.contains(&c.image_url)) {
                project.image_url = Some(card.image_url.clone());
                used.insert(card.image_url.clone());
            }
        }
    }

    // Index sweep: reuse by position rather than leave a project imageless.
    for (idx, project) in projects.iter_mut().enumerate() {
        if project.image_url.is_none() {
            if let Some(card) = cards.get(idx) {
                project.image_url = Some(card.image_url.clone());
            }
        }
    }
}

fn prefix15(s: &str) -> String {
    s.chars().take(15).collect()
}

/// Second pass: fetch up to three project detail pages and fold their fields
/// into the structured projects. A populated field is never overwritten with
/// an empty one.
async fn enrich_top_projects(
    ext: &Extractors,
    projects: &mut [ProjectRecord],
    project_urls: &[String],
) {
    for (idx, project) in projects.iter_mut().take(MAX_PROJECT_PAGES).enumerate() {
        match project_urls.get(idx) {
            Some(url) => {
                match fetch_project_details(ext, url).await {
                    Some(details) => merge_details(project, details),
                    None => debug!("project detail fetch failed for {url}"),
                }
                project.project_url = Some(url.clone());
            }
            None => {
                // No harvested URL; derive the canonical one from the name.
                let slug = project.name.to_lowercase().replace(' ', "-");
                if !slug.is_empty() {
                    project.project_url = Some(format!("https://devpost.com/software/{slug}"));
                }
            }
        }
    }
}

async fn fetch_project_details(ext: &Extractors, url: &str) -> Option<ProjectDetails> {
    let response = ext.http.get(url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let html = response.text().await.ok()?;
    Some(parse_project_details(&html))
}

fn youtube_embed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:youtube\.com/embed/|youtu\.be/)([A-Za-z0-9_-]+)").expect("valid regex")
    })
}

fn youtube_text_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]+)")
            .expect("valid regex")
    })
}

/// Extracts media links, extended description, technology tags, team members,
/// and screenshots from one project detail page.
fn parse_project_details(html: &str) -> ProjectDetails {
    let document = Html::parse_document(html);
    let mut details = ProjectDetails::default();

    // Video links, three independent methods: iframe embeds, anchor hrefs,
    // and bare URLs in the page text.
    let iframe_selector = Selector::parse("iframe").expect("valid selector");
    for iframe in document.select(&iframe_selector) {
        let src = iframe.value().attr("src").unwrap_or_default();
        if src.contains("youtube.com") || src.contains("youtu.be") {
            if let Some(caps) = youtube_embed_regex().captures(src) {
                push_unique(
                    &mut details.youtube_links,
                    format!("https://www.youtube.com/watch?v={}", &caps[1]),
                );
            }
        }
    }

    let link_selector = Selector::parse("a").expect("valid selector");
    for link in document.select(&link_selector) {
        let href = link.value().attr("href").unwrap_or_default();
        if href.contains("youtube.com") || href.contains("youtu.be") {
            push_unique(&mut details.youtube_links, normalize_youtube_url(href));
        }
    }

    let page_text: String = document.root_element().text().collect::<Vec<_>>().join("\n");
    for caps in youtube_text_regex().captures_iter(&page_text) {
        push_unique(
            &mut details.youtube_links,
            format!("https://www.youtube.com/watch?v={}", &caps[1]),
        );
    }

    let block_selector = Selector::parse("div, section").expect("valid selector");

    for el in document.select(&block_selector) {
        if details.full_description.is_empty()
            && class_contains(&el, &["description", "about", "overview"])
        {
            let text = crate::fetch::clean_text(&el.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                details.full_description = truncate_chars(&text, DESCRIPTION_CAP);
            }
        }

        if class_contains(&el, &["built-with", "technologies", "tech-stack"]) {
            let tag_selector = Selector::parse("span, a, li").expect("valid selector");
            for tag in el.select(&tag_selector) {
                if class_contains(&tag, &["tag", "tech", "technology"]) {
                    let tech = crate::fetch::clean_text(&tag.text().collect::<Vec<_>>().join(" "));
                    if !tech.is_empty() {
                        push_unique(&mut details.built_with, tech);
                    }
                }
            }
        }

        if class_contains(&el, &["team", "contributors", "authors"]) {
            for member in el.select(&link_selector) {
                let href = member.value().attr("href").unwrap_or_default();
                if href.contains("/users/") {
                    let name =
                        crate::fetch::clean_text(&member.text().collect::<Vec<_>>().join(" "));
                    if !name.is_empty() {
                        push_unique(&mut details.team_members, name);
                    }
                }
            }
        }

        if class_contains(&el, &["gallery", "screenshots", "images"]) {
            let img_selector = Selector::parse("img").expect("valid selector");
            for img in el.select(&img_selector) {
                if let Some(src) = image_source(&img) {
                    let lowered = src.to_lowercase();
                    if lowered.contains("screenshot") || lowered.contains("gallery") {
                        push_unique(&mut details.screenshots, absolutize(&src));
                    }
                }
            }
        }
    }

    details
}

fn normalize_youtube_url(href: &str) -> String {
    if href.contains("youtu.be") {
        let id = href
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .split('?')
            .next()
            .unwrap_or_default();
        format!("https://www.youtube.com/watch?v={id}")
    } else if href.contains("watch?v=") {
        href.split('&').next().unwrap_or(href).to_string()
    } else {
        href.to_string()
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}

/// Enrichment merge: populated structured fields win over detail-page fields,
/// empty ones are filled in.
fn merge_details(project: &mut ProjectRecord, details: ProjectDetails) {
    if project.youtube_links.is_empty() && !details.youtube_links.is_empty() {
        project.youtube_links = details.youtube_links;
    }
    if project.full_description.is_empty() && !details.full_description.is_empty() {
        project.full_description = details.full_description;
    }
    if project.built_with.is_empty() && !details.built_with.is_empty() {
        project.built_with = details.built_with;
    }
    if project.team_members.is_empty() && !details.team_members.is_empty() {
        project.team_members = details.team_members;
    }
    if project.screenshots.is_empty() && !details.screenshots.is_empty() {
        project.screenshots = details.screenshots;
    }
}

/// Structuring-failure fallback: a minimal profile carrying the page name (if
/// one is visible in an `h1`) and the raw digest, never an error record.
fn fallback_profile(html: &str, digest: &str) -> DevpostProfile {
    let document = Html::parse_document(html);
    let h1_selector = Selector::parse("h1").expect("valid selector");
    let name = document
        .select(&h1_selector)
        .map(|h1| crate::fetch::clean_text(&h1.text().collect::<Vec<_>>().join(" ")))
        .find(|text| !text.is_empty() && text.chars().count() < 100)
        .unwrap_or_default();

    DevpostProfile {
        name,
        raw_text: truncate_chars(digest, FALLBACK_RAW_CAP),
        ..Default::default()
    }
}
