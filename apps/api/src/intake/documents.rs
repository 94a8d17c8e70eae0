//! Resume document handling: text extraction from uploaded files.

use std::io::Read;

use crate::errors::AppError;

/// Extracts plain text from an uploaded resume. PDF goes through
/// `pdf-extract`, docx is unpacked as zip + OOXML, plain text is decoded as
/// UTF-8. Anything else is rejected up front.
pub fn extract_resume_text(filename: &str, bytes: &[u8]) -> Result<String, AppError> {
    let extension = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            AppError::UnprocessableEntity(format!("Could not extract text from PDF: {e}"))
        })?,
        "docx" => extract_docx_text(bytes)?,
        "txt" => String::from_utf8_lossy(bytes).into_owned(),
        other => {
            return Err(AppError::Validation(format!(
                "Unsupported file type '{other}'. Supported types: pdf, docx, txt"
            )))
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "The uploaded file contained no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// A docx is a zip archive whose body text lives in `word/document.xml`.
fn extract_docx_text(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| {
        AppError::UnprocessableEntity(format!("Could not read docx archive: {e}"))
    })?;
    let mut xml = Vec::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| {
            AppError::UnprocessableEntity(format!("Not a Word document: {e}"))
        })?
        .read_to_end(&mut xml)
        .map_err(|e| {
            AppError::UnprocessableEntity(format!("Could not read docx archive: {e}"))
        })?;
    document_xml_to_text(&xml)
}

/// Concatenates the `w:t` runs, breaking a line at each paragraph end so
/// section headers and bullets keep their own lines.
fn document_xml_to_text(xml: &[u8]) -> Result<String, AppError> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => {
                if let Ok(Event::Text(run)) = reader.read_event_into(&mut buf) {
                    text.push_str(run.unescape().unwrap_or_default().as_ref());
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => {
                text.push('\n');
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AppError::UnprocessableEntity(format!(
                    "Malformed docx content: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_document_xml(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file(
                "word/document.xml",
                zip::write::SimpleFileOptions::default(),
            )
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_txt_upload_decodes_utf8() {
        let text = extract_resume_text("resume.txt", "Jane Doe\nEngineer".as_bytes()).unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(extract_resume_text("RESUME.TXT", b"content").is_ok());
    }

    #[test]
    fn test_unsupported_extension_is_validation_error() {
        let err = extract_resume_text("resume.png", b"ignored").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_text_is_unprocessable() {
        let err = extract_resume_text("resume.txt", b"   \n  ").unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_docx_upload_joins_runs_and_breaks_paragraphs() {
        let bytes = docx_with_document_xml(
            r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
                <w:p><w:r><w:t>Systems Eng</w:t></w:r><w:r><w:t>ineer</w:t></w:r></w:p>
              </w:body>
            </w:document>"#,
        );
        let text = extract_resume_text("resume.docx", &bytes).unwrap();
        assert_eq!(text.trim(), "Jane Doe\nSystems Engineer");
    }

    #[test]
    fn test_docx_that_is_not_a_zip_is_unprocessable() {
        let err = extract_resume_text("resume.docx", b"not a zip").unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_zip_without_document_xml_is_unprocessable() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_resume_text("resume.docx", &bytes).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
