//! Storage key conventions.
//!
//! Pure string functions with no AWS SDK dependency. Finished artifacts are
//! laid out as `[type]/[year]/[month]/[title]_[timestamp].pdf`.

use jiff::civil::DateTime;

use crate::models::document_type::DocumentType;

const MAX_FILENAME_STEM: usize = 50;

/// Suggested storage key for a finished PDF.
pub fn artifact(document_type: DocumentType, title: &str, at: DateTime) -> String {
    format!(
        "{}/{:04}/{:02}/{}",
        document_type,
        at.year(),
        at.month(),
        artifact_filename(title, at)
    )
}

pub fn artifact_filename(title: &str, at: DateTime) -> String {
    format!(
        "{}_{}.pdf",
        sanitize_filename(title),
        at.strftime("%Y%m%d_%H%M%S")
    )
}

/// Reduce a title to a filename stem: alphanumerics, `_` and `-` kept,
/// whitespace and dash runs collapsed to `_`, at most 50 characters.
pub fn sanitize_filename(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '-')
        .collect();

    let mut stem = String::with_capacity(kept.len());
    let mut in_separator = false;
    for c in kept.chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                stem.push('_');
                in_separator = true;
            }
        } else {
            stem.push(c);
            in_separator = false;
        }
    }

    let truncated: String = stem
        .trim_matches('_')
        .chars()
        .take(MAX_FILENAME_STEM)
        .collect();
    let stem = truncated.trim_end_matches('_');

    if stem.is_empty() {
        "document".to_string()
    } else {
        stem.to_string()
    }
}

pub fn transcribe_input(job_name: &str, extension: &str) -> String {
    format!("_transcribe/input/{job_name}.{extension}")
}

pub fn transcribe_output(job_name: &str) -> String {
    format!("_transcribe/output/{job_name}.json")
}
