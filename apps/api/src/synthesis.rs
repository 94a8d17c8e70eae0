//! Profile Synthesizer — one structuring call over the resume text, the
//! scraped source records, and (optionally) a job description. The schema
//! branches on the job description: scoring fields exist only when one was
//! supplied.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use crate::extractors::SourceRecord;
use crate::fetch::truncate_chars;
use crate::llm_client::TextGenerator;
use crate::structuring::{Structured, Structurer};

const RESUME_CAP: usize = 3000;
const RECORDS_CAP: usize = 4000;
const JD_CAP: usize = 2000;

const BASE_SCHEMA: &str = r#"{
    "summary": "2-3 paragraph professional summary",
    "strengths": ["strength1", "strength2"],
    "weaknesses": ["area for improvement 1"],
    "key_points": ["notable point 1"],
    "unique_highlights": ["what makes this person stand out"],
    "skills": ["skill1", "skill2"],
    "recommendations": ["recommendation for the candidate"]
}"#;

const SCORED_SCHEMA: &str = r#"{
    "summary": "2-3 paragraph professional summary",
    "strengths": ["strength1", "strength2"],
    "weaknesses": ["area for improvement 1"],
    "key_points": ["notable point 1"],
    "unique_highlights": ["what makes this person stand out"],
    "skills": ["skill1", "skill2"],
    "recommendations": ["recommendation for the candidate"],
    "match_score": 0,
    "skills_match": {
        "matched_skills": ["skill present in both"],
        "missing_skills": ["required skill not evidenced"]
    }
}"#;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsMatch {
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub unique_highlights: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// 0..=100, present only when a job description was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_match: Option<SkillsMatch>,
}

pub struct Synthesizer {
    structurer: Structurer,
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            structurer: Structurer::new(generator),
        }
    }

    /// Produces one analysis from everything gathered so far. Structuring
    /// failure degrades to a fallback whose `summary` carries the raw model
    /// text, all lists empty; it never errors.
    pub async fn synthesize(
        &self,
        resume_text: &str,
        records: &BTreeMap<String, SourceRecord>,
        job_description: Option<&str>,
    ) -> AnalysisResult {
        let prompt = build_prompt(resume_text, records, job_description);
        match self.structurer.object::<AnalysisResult>(&prompt).await {
            Structured::Parsed(mut analysis) => {
                if job_description.is_none() {
                    // The model occasionally scores anyway; an unscored run
                    // must not carry score fields.
                    analysis.match_score = None;
                    analysis.skills_match = None;
                }
                analysis
            }
            Structured::Raw(text) => {
                warn!("analysis structuring failed, returning raw summary");
                AnalysisResult {
                    summary: text,
                    ..Default::default()
                }
            }
        }
    }
}

fn build_prompt(
    resume_text: &str,
    records: &BTreeMap<String, SourceRecord>,
    job_description: Option<&str>,
) -> String {
    let records_json =
        serde_json::to_string_pretty(records).unwrap_or_else(|_| json!({}).to_string());

    let mut prompt = format!(
        "Analyze the following candidate information and produce a comprehensive \
         professional profile.\n\nResume text:\n{}\n\nInformation gathered from \
         the candidate's online profiles:\n{}\n",
        truncate_chars(resume_text, RESUME_CAP),
        truncate_chars(&records_json, RECORDS_CAP),
    );

    let schema = match job_description {
        Some(jd) => {
            prompt.push_str(&format!(
                "\nJob description to evaluate the candidate against:\n{}\n\n\
                 Score the candidate's fit for this role from 0 to 100 and list \
                 which required skills are matched and which are missing.\n",
                truncate_chars(jd, JD_CAP)
            ));
            SCORED_SCHEMA
        }
        None => BASE_SCHEMA,
    };

    prompt.push_str(&format!(
        "\nReturn a JSON object with this EXACT schema:\n{schema}\n\n\
         Return ONLY valid JSON, no additional text or markdown formatting."
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structuring::test_support::ScriptedGenerator;

    #[tokio::test]
    async fn test_synthesize_parses_scored_analysis() {
        let generator = Arc::new(ScriptedGenerator::new(vec![r#"{
            "summary": "A strong systems engineer.",
            "strengths": ["Rust"],
            "match_score": 82,
            "skills_match": {"matched_skills": ["Rust"], "missing_skills": ["Go"]}
        }"#]));
        let synth = Synthesizer::new(generator);
        let analysis = synth
            .synthesize("resume", &BTreeMap::new(), Some("a Rust role"))
            .await;
        assert_eq!(analysis.match_score, Some(82));
        assert_eq!(
            analysis.skills_match.unwrap().missing_skills,
            vec!["Go".to_string()]
        );
    }

    #[tokio::test]
    async fn test_synthesize_strips_score_without_job_description() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            r#"{"summary": "ok", "match_score": 90}"#,
        ]));
        let synth = Synthesizer::new(generator);
        let analysis = synth.synthesize("resume", &BTreeMap::new(), None).await;
        assert!(analysis.match_score.is_none());
        assert!(analysis.skills_match.is_none());
    }

    #[tokio::test]
    async fn test_synthesize_fallback_carries_raw_text_as_summary() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            "I could not produce JSON for this one.",
        ]));
        let synth = Synthesizer::new(generator);
        let analysis = synth.synthesize("resume", &BTreeMap::new(), None).await;
        assert_eq!(analysis.summary, "I could not produce JSON for this one.");
        assert!(analysis.strengths.is_empty());
        assert!(analysis.skills.is_empty());
    }

    #[test]
    fn test_prompt_branches_on_job_description() {
        let without = build_prompt("r", &BTreeMap::new(), None);
        let with = build_prompt("r", &BTreeMap::new(), Some("jd text"));
        assert!(!without.contains("match_score"));
        assert!(with.contains("match_score"));
        assert!(with.contains("jd text"));
    }

    #[test]
    fn test_score_fields_omitted_on_the_wire() {
        let analysis = AnalysisResult {
            summary: "s".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("match_score").is_none());
        assert!(json.get("skills_match").is_none());
    }
}
