//! Upload pipeline: multipart resume intake, link classification, scraping,
//! synthesis, and persistence, ending in one response envelope. Per-platform
//! scrape failures stay inside the envelope as `Failed` records; only
//! request-shape problems and storage failures surface as errors.

pub mod documents;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::errors::AppError;
use crate::extractors::SourceRecord;
use crate::fetch::truncate_chars;
use crate::links::{classify, extract_urls, ProfileLink};
use crate::state::AppState;
use crate::storage::PersonBundle;
use crate::synthesis::AnalysisResult;

const RESUME_PREVIEW_CAP: usize = 500;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub person_name: String,
    pub analysis: AnalysisResult,
    pub source_records: BTreeMap<String, SourceRecord>,
    pub resume_preview: String,
    pub has_job_description: bool,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct ExtractLinksResponse {
    pub links: Vec<String>,
}

#[derive(Debug, Default)]
struct UploadFields {
    resume: Option<(String, Vec<u8>)>,
    person_name: String,
    links: String,
    job_description: Option<String>,
}

async fn collect_fields(multipart: &mut Multipart) -> Result<UploadFields, AppError> {
    let mut fields = UploadFields::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart request: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume: {e}")))?;
                fields.resume = Some((filename, bytes.to_vec()));
            }
            "person_name" => {
                fields.person_name = read_text_field(field).await?.trim().to_string();
            }
            "links" => {
                fields.links = read_text_field(field).await?;
            }
            "job_description" => {
                let text = read_text_field(field).await?;
                if !text.trim().is_empty() {
                    fields.job_description = Some(text);
                }
            }
            _ => {}
        }
    }
    Ok(fields)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read form field: {e}")))
}

fn classify_links(raw: &str) -> Vec<ProfileLink> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(classify)
        .collect()
}

/// POST /api/v1/profiles
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let fields = collect_fields(&mut multipart).await?;

    let (filename, bytes) = fields
        .resume
        .ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;
    if fields.person_name.is_empty() {
        return Err(AppError::Validation("person_name is required".to_string()));
    }

    let resume_text = documents::extract_resume_text(&filename, &bytes)?;
    let links = classify_links(&fields.links);
    info!(
        "processing upload for {}: {} classified links",
        fields.person_name,
        links.len()
    );

    let source_records = state.extractors.scrape_all(&links).await;
    let analysis = state
        .synthesizer
        .synthesize(
            &resume_text,
            &source_records,
            fields.job_description.as_deref(),
        )
        .await;

    let has_job_description = fields.job_description.is_some();
    let bundle = PersonBundle::new(
        fields.person_name.clone(),
        resume_text.clone(),
        analysis.clone(),
        source_records.clone(),
        fields.job_description,
    );
    state.store.save(&bundle).await?;

    Ok(Json(UploadResponse {
        person_name: fields.person_name,
        analysis,
        source_records,
        resume_preview: truncate_chars(&resume_text, RESUME_PREVIEW_CAP),
        has_job_description,
        saved: true,
    }))
}

/// POST /api/v1/profiles/extract-links
pub async fn handle_extract_links(
    mut multipart: Multipart,
) -> Result<Json<ExtractLinksResponse>, AppError> {
    let fields = collect_fields(&mut multipart).await?;
    let (filename, bytes) = fields
        .resume
        .ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;
    let resume_text = documents::extract_resume_text(&filename, &bytes)?;
    Ok(Json(ExtractLinksResponse {
        links: extract_urls(&resume_text),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::Platform;

    #[test]
    fn test_classify_links_splits_and_skips_blanks() {
        let links = classify_links("https://github.com/jane, , devpost.com/jane,");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].platform, Platform::Github);
        assert_eq!(links[1].platform, Platform::Devpost);
    }

    #[test]
    fn test_classify_links_empty_input() {
        assert!(classify_links("").is_empty());
    }
}
