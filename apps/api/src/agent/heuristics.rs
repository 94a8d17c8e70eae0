//! Project-name recovery heuristics for the chat agent.
//!
//! Best-effort regex extraction of candidate project names from prior tool
//! results, recent assistant turns, and the resume text. Output is a set of
//! hints checked against scraped content; it never drives control flow on its
//! own.

use regex::Regex;
use std::sync::OnceLock;

use super::ChatTurn;

/// Messages like "are those projects on his GitHub?" trigger recovery.
pub fn mentions_projects(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("project") || lowered.contains("those")
}

fn capitalized_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Z][a-zA-Z]+(?:AI|App|System|Platform|Tube)?)\b").expect("valid regex")
    })
}

fn bullet_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*[*\-\d.]+\s*\*{0,2}([A-Z][a-zA-Z]+(?:AI|App|System|Platform|Tube)?)")
            .expect("valid regex")
    })
}

fn resume_project_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:[Pp]rojects?)[\s:]*([A-Z][a-zA-Z ]+(?:AI|App|System|Platform|Tube)?)")
            .expect("valid regex")
    })
}

/// Recovers candidate project names from the three places they tend to
/// appear: earlier tool results mentioning projects, the last few assistant
/// turns (bullet lists), and the resume's project sections.
pub fn recover_project_names(
    tool_log: &[String],
    history: &[ChatTurn],
    resume_text: &str,
) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for result in tool_log {
        if result.to_lowercase().contains("project") {
            for caps in capitalized_name_regex().captures_iter(result) {
                push_candidate(&mut names, &caps[1]);
            }
        }
    }

    for turn in history.iter().rev().take(3) {
        if turn.role == "assistant" {
            for caps in bullet_name_regex().captures_iter(&turn.content) {
                push_candidate(&mut names, &caps[1]);
            }
        }
    }

    if resume_text.to_lowercase().contains("project") {
        for caps in resume_project_regex().captures_iter(resume_text) {
            let cleaned = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
            // Longer captures are usually sentence fragments, not names.
            if cleaned.split_whitespace().count() <= 3 {
                push_candidate(&mut names, &cleaned);
            }
        }
    }

    names
}

fn push_candidate(names: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if trimmed.len() > 2 && !names.iter().any(|n| n.eq_ignore_ascii_case(trimmed)) {
        names.push(trimmed.to_string());
    }
}

/// Case-insensitive presence check of each candidate in scraped content.
pub fn check_projects(names: &[String], content: &str) -> (Vec<String>, Vec<String>) {
    let content_lower = content.to_lowercase();
    let mut found = Vec::new();
    let mut missing = Vec::new();
    for name in names {
        if content_lower.contains(&name.to_lowercase()) {
            found.push(name.clone());
        } else {
            missing.push(name.clone());
        }
    }
    (found, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_mentions_projects_triggers() {
        assert!(mentions_projects("are those on his GitHub?"));
        assert!(mentions_projects("what projects did she build?"));
        assert!(!mentions_projects("where does she work?"));
    }

    #[test]
    fn test_recovers_from_tool_log_mentioning_projects() {
        let log = vec!["Projects listed: CrunchTube and InqubeAI won awards".to_string()];
        let names = recover_project_names(&log, &[], "");
        assert!(names.contains(&"CrunchTube".to_string()));
        assert!(names.contains(&"InqubeAI".to_string()));
    }

    #[test]
    fn test_ignores_tool_log_without_project_mention() {
        let log = vec!["Scraped a page about Gardening".to_string()];
        assert!(recover_project_names(&log, &[], "").is_empty());
    }

    #[test]
    fn test_recovers_from_assistant_bullet_lists() {
        let history = vec![
            turn("user", "- NotAProject"),
            turn("assistant", "They built:\n- CrunchTube: a video tool\n* InqubeAI"),
        ];
        let names = recover_project_names(&[], &history, "");
        assert!(names.contains(&"CrunchTube".to_string()));
        assert!(names.contains(&"InqubeAI".to_string()));
        assert!(!names.contains(&"NotAProject".to_string()));
    }

    #[test]
    fn test_recovers_short_names_from_resume_project_section() {
        let resume = "Projects:\nCrunchTube Video Platform\nBuilt with Rust and axum.";
        let names = recover_project_names(&[], &[], resume);
        assert!(names.contains(&"CrunchTube Video Platform".to_string()));
    }

    #[test]
    fn test_deduplicates_case_insensitively() {
        let log = vec![
            "project CrunchTube".to_string(),
            "project CRUNCHTUBE again".to_string(),
        ];
        let names = recover_project_names(&log, &[], "");
        let matches = names
            .iter()
            .filter(|n| n.eq_ignore_ascii_case("crunchtube"))
            .count();
        assert_eq!(matches, 1);
    }

    #[test]
    fn test_check_projects_splits_found_and_missing() {
        let names = vec!["CrunchTube".to_string(), "Ghost".to_string()];
        let (found, missing) = check_projects(&names, "repos: crunchtube, other-repo");
        assert_eq!(found, vec!["CrunchTube"]);
        assert_eq!(missing, vec!["Ghost"]);
    }
}
