//! Agent Loop — the chat-time controller.
//!
//! A strict state machine: decide → execute → decide …, with an explicit
//! ceiling of five tool executions, then one finalization call. The decision
//! model is asked for JSON but not trusted: parse failure falls back to a
//! regex object recovery, and failing that the raw text is the final answer.

pub mod handlers;
pub mod heuristics;
pub mod prompts;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::config::Capabilities;
use crate::fetch::{ensure_https, truncate_chars, ContentFetcher, BROWSER_USER_AGENT};
use crate::links::extract_urls;
use crate::llm_client::{LlmError, TextGenerator};
use crate::search::search_web;
use crate::storage::PersonBundle;
use crate::structuring::{strip_json_fences, JSON_ONLY_SYSTEM};

use self::prompts::{DECISION_TEMPLATE, FINAL_TEMPLATE};

/// Hard ceiling on tool executions per turn.
const MAX_TOOL_EXECUTIONS: usize = 5;

const RESUME_DECISION_CAP: usize = 8000;
const RESUME_FINAL_CAP: usize = 6000;
const ANALYSIS_CAP: usize = 2000;
const RECORDS_CAP: usize = 3000;
const JD_CAP: usize = 1000;
const PLATFORM_SCRAPE_CAP: usize = 4000;
const URL_SCRAPE_CAP: usize = 2000;
const PAPER_SCRAPE_CAP: usize = 3000;
const HISTORY_TURNS: usize = 5;

const ANSWER_SYSTEM: &str = "You are a helpful assistant answering questions \
    about a candidate's professional profile. Be clear, accurate, and specific.";

const PAPER_KEYWORDS: [&str; 7] = [
    "paper",
    "publication",
    "research",
    "article",
    "co-author",
    "coauthor",
    "author",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
struct Decision {
    #[serde(default)]
    needs_tool: bool,
    #[serde(default)]
    tool: String,
    #[serde(default)]
    tool_input: String,
    #[serde(default)]
    final_answer: String,
    #[serde(default)]
    #[allow(dead_code)]
    reasoning: String,
}

#[derive(Debug)]
pub struct AgentReply {
    pub answer: String,
    pub tools_used: Vec<String>,
}

/// Per-turn context derived once from the stored bundle.
struct SessionContext {
    person_name: String,
    first_name: String,
    resume_text: String,
    analysis_json: String,
    records_json: String,
    job_description: Option<String>,
    /// Every URL harvested from the resume text and the serialized records.
    urls: Vec<String>,
    /// platform token → URL, e.g. both "github" and "github.com".
    url_map: Vec<(String, String)>,
}

fn name_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)").expect("valid regex")
    })
}

fn json_object_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^}]+\}").expect("valid regex"))
}

impl SessionContext {
    fn build(bundle: &PersonBundle) -> Self {
        let person_name = if !bundle.metadata.person_name.is_empty() {
            bundle.metadata.person_name.clone()
        } else {
            name_line_regex()
                .captures(&bundle.resume_text)
                .map(|caps| caps[1].to_string())
                .unwrap_or_default()
        };
        let first_name = person_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();

        let records_json =
            serde_json::to_string_pretty(&bundle.source_records).unwrap_or_default();

        let mut urls = extract_urls(&bundle.resume_text);
        for url in extract_urls(&records_json) {
            if !urls.contains(&url) {
                urls.push(url);
            }
        }

        let mut url_map: Vec<(String, String)> = Vec::new();
        for url in &urls {
            let lowered = url.to_lowercase();
            for host in ["github", "linkedin", "devpost", "kaggle", "orcid"] {
                if lowered.contains(&format!("{host}.")) {
                    for key in [host.to_string(), format!("{host}.com")] {
                        if !url_map.iter().any(|(k, _)| k == &key) {
                            url_map.push((key, url.clone()));
                        }
                    }
                }
            }
        }

        let analysis_json =
            serde_json::to_string_pretty(&bundle.analysis).unwrap_or_default();

        Self {
            person_name,
            first_name,
            resume_text: bundle.resume_text.clone(),
            analysis_json,
            records_json,
            job_description: bundle.job_description.clone(),
            urls,
            url_map,
        }
    }

    fn url_preview(&self) -> String {
        self.urls
            .iter()
            .take(5)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The chat-time controller, constructed once and shared via `AppState`.
pub struct Agent {
    generator: Arc<dyn TextGenerator>,
    fetcher: Arc<ContentFetcher>,
    http: Client,
    capabilities: Capabilities,
}

impl Agent {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        fetcher: Arc<ContentFetcher>,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            generator,
            fetcher,
            http: Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
            capabilities,
        }
    }

    /// One chat turn. Tool results accumulate in a per-turn log that is
    /// discarded when the turn ends; only the answer and the tool-name list
    /// leave this function.
    pub async fn run(
        &self,
        bundle: &PersonBundle,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<AgentReply, LlmError> {
        let ctx = SessionContext::build(bundle);
        let mut tools_used: Vec<String> = Vec::new();
        let mut tool_log: Vec<String> = Vec::new();

        for iteration in 0..MAX_TOOL_EXECUTIONS {
            let prompt = decision_prompt(&ctx, message, history, &tool_log);
            let raw = match self.generator.generate(&prompt, JSON_ONLY_SYSTEM).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("decision call failed on iteration {iteration}: {e}");
                    break;
                }
            };
            let decision = parse_decision(&raw);

            if !decision.needs_tool {
                let mut answer = if decision.final_answer.is_empty() {
                    strip_json_fences(&raw).to_string()
                } else {
                    decision.final_answer
                };
                if !tool_log.is_empty() {
                    answer = format!("{}\n\n{answer}", tool_log.join("\n\n"));
                }
                return Ok(AgentReply {
                    answer,
                    tools_used: finish_tools(tools_used),
                });
            }

            debug!(
                "iteration {iteration}: executing {} ({})",
                decision.tool, decision.tool_input
            );
            match decision.tool.as_str() {
                "search_website" => {
                    tools_used.push("search_website".to_string());
                    self.search_website(&ctx, message, history, &decision.tool_input, &mut tool_log)
                        .await;
                }
                "analyze_media" => {
                    tools_used.push("analyze_media".to_string());
                    self.analyze_media(&decision.tool_input, &mut tool_log).await;
                }
                "lookup_resume" => {
                    // The full resume is already in the decision context.
                    tools_used.push("lookup_resume".to_string());
                }
                other => {
                    warn!("decision named unknown tool '{other}', finalizing");
                    break;
                }
            }
        }

        let final_prompt = FINAL_TEMPLATE
            .replace("{person_name}", display_name(&ctx.person_name))
            .replace(
                "{resume_text}",
                &truncate_chars(&ctx.resume_text, RESUME_FINAL_CAP),
            )
            .replace(
                "{tool_results}",
                &if tool_log.is_empty() {
                    "No additional tool results".to_string()
                } else {
                    tool_log.join("\n")
                },
            )
            .replace("{message}", message);

        let answer = self.generator.generate(&final_prompt, ANSWER_SYSTEM).await?;
        Ok(AgentReply {
            answer,
            tools_used: finish_tools(tools_used),
        })
    }

    /// The website tool. Input resolution precedence: platform mention →
    /// literal URL → paper/publication search → fuzzy match against harvested
    /// URLs → https-coerced direct attempt.
    async fn search_website(
        &self,
        ctx: &SessionContext,
        message: &str,
        history: &[ChatTurn],
        tool_input: &str,
        tool_log: &mut Vec<String>,
    ) {
        let input_lower = tool_input.to_lowercase();
        let message_lower = message.to_lowercase();

        let project_names = if heuristics::mentions_projects(message) {
            heuristics::recover_project_names(tool_log, history, &ctx.resume_text)
        } else {
            Vec::new()
        };

        // Platform mention, in the tool input or the message itself.
        if let Some((platform, url)) = ctx
            .url_map
            .iter()
            .find(|(key, _)| input_lower.contains(key.as_str()) || message_lower.contains(key.as_str()))
        {
            tool_log.push(format!("Found {url} from resume links"));
            match self.scrape(url, PLATFORM_SCRAPE_CAP).await {
                Some(content) => {
                    tool_log.push(format!("Scraped {url}:\n{content}"));
                    if !project_names.is_empty() {
                        let (found, missing) = heuristics::check_projects(&project_names, &content);
                        if !found.is_empty() {
                            tool_log.push(format!(
                                "Found projects on {platform}: {}",
                                found.join(", ")
                            ));
                        }
                        if !missing.is_empty() {
                            tool_log.push(format!(
                                "Projects not found on {platform}: {}",
                                missing.join(", ")
                            ));
                        }
                    }
                }
                None => tool_log.push(format!("Could not scrape {url}")),
            }
            return;
        }

        // Already a literal URL.
        if tool_input.starts_with("http://") || tool_input.starts_with("https://") {
            match self.scrape(tool_input, URL_SCRAPE_CAP).await {
                Some(content) => tool_log.push(format!("Scraped {tool_input}:\n{content}")),
                None => tool_log.push(format!("Could not scrape {tool_input}")),
            }
            return;
        }

        // Paper/publication questions: web search, scrape the top hit, check
        // for the person's name in it.
        if PAPER_KEYWORDS.iter().any(|k| message_lower.contains(k)) {
            let query = extract_paper_title(message, tool_input);
            let results = search_web(&self.http, &query, 3).await;
            match results.first() {
                Some(first) => {
                    tool_log.push(format!("Searched the web for '{query}' and found: {first}"));
                    match self.scrape(first, PAPER_SCRAPE_CAP).await {
                        Some(content) => {
                            tool_log.push(format!("Scraped content from {first}:\n{content}"));
                            let content_lower = content.to_lowercase();
                            if !ctx.person_name.is_empty()
                                && content_lower.contains(&ctx.person_name.to_lowercase())
                            {
                                tool_log.push(format!(
                                    "Found person's name '{}' in the content",
                                    ctx.person_name
                                ));
                            } else if !ctx.first_name.is_empty()
                                && content_lower.contains(&ctx.first_name.to_lowercase())
                            {
                                tool_log.push(format!(
                                    "Found first name '{}' in the content (partial match)",
                                    ctx.first_name
                                ));
                            } else {
                                tool_log.push(format!(
                                    "Person's name '{}' not found in the content",
                                    ctx.person_name
                                ));
                            }
                        }
                        None => tool_log.push(format!("Could not scrape {first}")),
                    }
                }
                None => tool_log.push(format!("No web search results found for '{query}'")),
            }
            return;
        }

        if !tool_input.is_empty() {
            // Fuzzy match against the harvested URLs.
            let matching = ctx.urls.iter().find(|url| {
                let url_lower = url.to_lowercase();
                url_lower.contains(&input_lower) || input_lower.contains(&url_lower)
            });
            match matching {
                Some(url) => match self.scrape(url, URL_SCRAPE_CAP).await {
                    Some(content) => tool_log.push(format!("Scraped {url}:\n{content}")),
                    None => tool_log.push(format!("Could not scrape {url}")),
                },
                None => {
                    let url = ensure_https(tool_input);
                    match self.scrape(&url, URL_SCRAPE_CAP).await {
                        Some(content) => tool_log.push(format!("Scraped {url}:\n{content}")),
                        None => tool_log.push(format!(
                            "Could not scrape {url}. Available URLs from resume: {}",
                            ctx.url_preview()
                        )),
                    }
                }
            }
            return;
        }

        tool_log.push(format!(
            "No URL specified. Available URLs from resume: {}",
            ctx.url_preview()
        ));
    }

    async fn analyze_media(&self, url: &str, tool_log: &mut Vec<String>) {
        if url.is_empty() {
            tool_log.push("No media URL specified".to_string());
            return;
        }
        if !self.capabilities.vision {
            tool_log.push(format!("Media analysis is not available for {url}"));
            return;
        }
        match self.generator.describe_media(url).await {
            Ok(result) => tool_log.push(format!("Analyzed media at {url}:\n{result}")),
            Err(e) => tool_log.push(format!("Error analyzing media at {url}: {e}")),
        }
    }

    async fn scrape(&self, url: &str, cap: usize) -> Option<String> {
        match self.fetcher.fetch(url).await {
            Ok(content) if !content.markdown.trim().is_empty() => {
                Some(truncate_chars(&content.markdown, cap))
            }
            Ok(_) => None,
            Err(e) => {
                debug!("agent scrape failed for {url}: {e}");
                None
            }
        }
    }
}

fn decision_prompt(
    ctx: &SessionContext,
    message: &str,
    history: &[ChatTurn],
    tool_log: &[String],
) -> String {
    let mut resume = truncate_chars(&ctx.resume_text, RESUME_DECISION_CAP);
    if ctx.resume_text.chars().count() > RESUME_DECISION_CAP {
        resume.push_str("\n\n[Resume text truncated for length, but all key sections should be visible above]");
    }

    let available_urls = if ctx.urls.is_empty() {
        String::new()
    } else {
        let links: Vec<String> = ctx.urls.iter().take(20).map(|u| format!("- {u}")).collect();
        let mapping: Vec<String> = ctx
            .url_map
            .iter()
            .map(|(key, url)| format!("- {key}: {url}"))
            .collect();
        format!(
            "AVAILABLE LINKS FROM RESUME:\n{}\n\nURL MAPPING (use these when user mentions platforms):\n{}",
            links.join("\n"),
            mapping.join("\n")
        )
    };

    let job_description = ctx
        .job_description
        .as_deref()
        .map(|jd| format!("JOB DESCRIPTION (if relevant): {}", truncate_chars(jd, JD_CAP)))
        .unwrap_or_default();

    let tool_results = if tool_log.is_empty() {
        String::new()
    } else {
        format!(
            "TOOL RESULTS FROM PREVIOUS ITERATIONS:\n{}",
            tool_log.join("\n")
        )
    };

    let recent: Vec<&ChatTurn> = history.iter().rev().take(HISTORY_TURNS).rev().collect();
    let history_text = if recent.is_empty() {
        "No previous conversation".to_string()
    } else {
        serde_json::to_string_pretty(&recent).unwrap_or_default()
    };

    DECISION_TEMPLATE
        .replace("{person_name}", display_name(&ctx.person_name))
        .replace("{resume_text}", &resume)
        .replace("{analysis}", &truncate_chars(&ctx.analysis_json, ANALYSIS_CAP))
        .replace("{records}", &truncate_chars(&ctx.records_json, RECORDS_CAP))
        .replace("{available_urls}", &available_urls)
        .replace("{job_description}", &job_description)
        .replace("{tool_results}", &tool_results)
        .replace("{history}", &history_text)
        .replace("{message}", message)
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "Unknown"
    } else {
        name
    }
}

/// Decision parse with two fallbacks: regex object recovery, then treating
/// the whole text as a direct final answer.
fn parse_decision(text: &str) -> Decision {
    let cleaned = strip_json_fences(text);
    if let Ok(decision) = serde_json::from_str::<Decision>(cleaned) {
        return decision;
    }
    if let Some(found) = json_object_regex().find(cleaned) {
        if let Ok(decision) = serde_json::from_str::<Decision>(found.as_str()) {
            return decision;
        }
    }
    Decision {
        needs_tool: false,
        final_answer: cleaned.to_string(),
        ..Default::default()
    }
}

/// Candidate search query for paper/publication questions: quoted text, then
/// text after a paper-ish keyword, then the stripped-down message itself.
fn extract_paper_title(message: &str, tool_input: &str) -> String {
    static QUOTED: OnceLock<Regex> = OnceLock::new();
    let quoted = QUOTED.get_or_init(|| Regex::new(r#"["']([^"']+)["']"#).expect("valid regex"));
    if let Some(caps) = quoted.captures(message) {
        return caps[1].trim().to_string();
    }

    static AFTER_KEYWORD: OnceLock<Regex> = OnceLock::new();
    let after_keyword = AFTER_KEYWORD.get_or_init(|| {
        Regex::new(r"(?i)(?:paper|publication|research|article)\s+(?:called|titled|named|:)?\s*([^?.,!]+)")
            .expect("valid regex")
    });
    if let Some(caps) = after_keyword.captures(message) {
        return caps[1].trim().to_string();
    }

    let mut title = if tool_input.is_empty() {
        message.to_string()
    } else {
        tool_input.to_string()
    };
    static LEADING: OnceLock<Regex> = OnceLock::new();
    let leading = LEADING.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:was|is|are|can|do|does|did|will|would|could|should|tell|check|verify|lookup|look up|search for|find|he|she|they|a|an|the|co-author|coauthor|author|of)\s+",
        )
        .expect("valid regex")
    });
    loop {
        let stripped = leading.replace(&title, "").into_owned();
        if stripped == title {
            break;
        }
        title = stripped;
    }
    title.trim_end_matches('?').trim().to_string()
}

/// Ordered, deduplicated tool list; `lookup_resume` when nothing ran, since
/// the resume is always implicitly in context.
fn finish_tools(tools_used: Vec<String>) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::new();
    for tool in tools_used {
        if !ordered.contains(&tool) {
            ordered.push(tool);
        }
    }
    if ordered.is_empty() {
        ordered.push("lookup_resume".to_string());
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structuring::test_support::ScriptedGenerator;
    use crate::synthesis::AnalysisResult;
    use std::collections::BTreeMap;

    fn bundle(resume: &str) -> PersonBundle {
        PersonBundle::new(
            "Jane Doe".to_string(),
            resume.to_string(),
            AnalysisResult::default(),
            BTreeMap::new(),
            None,
        )
    }

    fn agent(generator: Arc<ScriptedGenerator>, vision: bool) -> Agent {
        Agent::new(
            generator,
            Arc::new(ContentFetcher::new(None)),
            Capabilities {
                scraping: false,
                vision,
            },
        )
    }

    #[tokio::test]
    async fn test_direct_answer_skips_tools() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            r#"{"needs_tool": false, "final_answer": "She is a systems engineer."}"#,
        ]));
        let reply = agent(generator.clone(), true)
            .run(&bundle("resume"), "what does she do?", &[])
            .await
            .unwrap();
        assert_eq!(reply.answer, "She is a systems engineer.");
        assert_eq!(reply.tools_used, vec!["lookup_resume"]);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_loop_is_bounded_at_five_executions() {
        // The decision model never signals completion.
        let generator = Arc::new(ScriptedGenerator::new(vec![
            r#"{"needs_tool": true, "tool": "lookup_resume", "tool_input": ""}"#,
        ]));
        let reply = agent(generator.clone(), true)
            .run(&bundle("resume"), "loop forever", &[])
            .await
            .unwrap();
        // 5 decision calls, then 1 finalization call.
        assert_eq!(generator.call_count(), 6);
        assert_eq!(reply.tools_used, vec!["lookup_resume"]);
    }

    #[tokio::test]
    async fn test_plain_text_decision_becomes_final_answer() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            "Jane has three projects listed on her resume.",
        ]));
        let reply = agent(generator.clone(), true)
            .run(&bundle("resume"), "projects?", &[])
            .await
            .unwrap();
        assert_eq!(reply.answer, "Jane has three projects listed on her resume.");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_decision_recovered_from_surrounding_prose() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            r#"Sure, here is my decision: {"needs_tool": false, "final_answer": "Recovered"} hope that helps"#,
        ]));
        let reply = agent(generator, true)
            .run(&bundle("resume"), "q", &[])
            .await
            .unwrap();
        assert_eq!(reply.answer, "Recovered");
    }

    #[tokio::test]
    async fn test_analyze_media_folds_description_into_answer() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            r#"{"needs_tool": true, "tool": "analyze_media", "tool_input": "https://x/demo.png"}"#,
            r#"{"needs_tool": false, "final_answer": "The demo shows a dashboard."}"#,
        ]));
        let reply = agent(generator, true)
            .run(&bundle("resume"), "what is in the demo image?", &[])
            .await
            .unwrap();
        assert!(reply
            .answer
            .contains("Analyzed media at https://x/demo.png:\ndescription of https://x/demo.png"));
        assert!(reply.answer.ends_with("The demo shows a dashboard."));
        assert_eq!(reply.tools_used, vec!["analyze_media"]);
    }

    #[tokio::test]
    async fn test_analyze_media_without_vision_capability() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            r#"{"needs_tool": true, "tool": "analyze_media", "tool_input": "https://x/demo.png"}"#,
            r#"{"needs_tool": false, "final_answer": "done"}"#,
        ]));
        let reply = agent(generator, false)
            .run(&bundle("resume"), "check the image", &[])
            .await
            .unwrap();
        assert!(reply
            .answer
            .contains("Media analysis is not available for https://x/demo.png"));
    }

    #[tokio::test]
    async fn test_tools_used_is_ordered_and_deduplicated() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            r#"{"needs_tool": true, "tool": "analyze_media", "tool_input": "https://x/a.png"}"#,
            r#"{"needs_tool": true, "tool": "lookup_resume", "tool_input": ""}"#,
            r#"{"needs_tool": true, "tool": "analyze_media", "tool_input": "https://x/b.png"}"#,
            r#"{"needs_tool": false, "final_answer": "done"}"#,
        ]));
        let reply = agent(generator, true)
            .run(&bundle("resume"), "q", &[])
            .await
            .unwrap();
        assert_eq!(reply.tools_used, vec!["analyze_media", "lookup_resume"]);
    }

    #[test]
    fn test_session_context_infers_name_from_resume() {
        let mut b = bundle("Jane Doe\nSystems Engineer\nhttps://github.com/janedoe");
        b.metadata.person_name = String::new();
        let ctx = SessionContext::build(&b);
        assert_eq!(ctx.person_name, "Jane Doe");
        assert_eq!(ctx.first_name, "Jane");
        assert_eq!(ctx.urls, vec!["https://github.com/janedoe"]);
        assert!(ctx
            .url_map
            .iter()
            .any(|(k, u)| k == "github" && u == "https://github.com/janedoe"));
    }

    #[test]
    fn test_parse_decision_fallback_is_direct_answer() {
        let decision = parse_decision("no json at all");
        assert!(!decision.needs_tool);
        assert_eq!(decision.final_answer, "no json at all");
    }

    #[test]
    fn test_extract_paper_title_prefers_quoted_text() {
        let title = extract_paper_title(
            "was she a co-author of the paper \"Fast Parsing at Scale\"?",
            "",
        );
        assert_eq!(title, "Fast Parsing at Scale");
    }

    #[test]
    fn test_extract_paper_title_after_keyword() {
        let title = extract_paper_title("did he write the paper titled Streaming Joins?", "");
        assert_eq!(title, "Streaming Joins");
    }

    #[test]
    fn test_extract_paper_title_strips_question_words() {
        let title = extract_paper_title("was she the author of Streaming Joins?", "");
        assert_eq!(title, "Streaming Joins");
    }

    #[test]
    fn test_finish_tools_defaults_to_lookup_resume() {
        assert_eq!(finish_tools(Vec::new()), vec!["lookup_resume"]);
    }
}
