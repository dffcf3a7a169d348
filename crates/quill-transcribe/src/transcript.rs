//! Parsing of the Amazon Transcribe output document.
//!
//! ```json
//! { "results": {
//!     "language_code": "en-US",
//!     "transcripts": [{ "transcript": "the text..." }],
//!     "items": [{ "type": "pronunciation",
//!                 "alternatives": [{ "confidence": "0.98", "content": "the" }] }] } }
//! ```

use serde::Deserialize;

use crate::error::TranscribeError;

#[derive(Debug, Deserialize)]
struct Output {
    results: Results,
}

#[derive(Debug, Deserialize)]
struct Results {
    #[serde(default)]
    language_code: Option<String>,
    #[serde(default)]
    transcripts: Vec<Transcript>,
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Transcript {
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    confidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTranscript {
    pub text: String,
    /// Mean confidence over pronunciation items; 0 when there are none.
    pub confidence: f32,
    pub language: Option<String>,
}

pub fn parse_transcript(json: &str) -> Result<ParsedTranscript, TranscribeError> {
    let output: Output =
        serde_json::from_str(json).map_err(|e| TranscribeError::Parse(e.to_string()))?;

    let text = output
        .results
        .transcripts
        .iter()
        .map(|t| t.transcript.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let scores: Vec<f32> = output
        .results
        .items
        .iter()
        .filter(|item| item.kind == "pronunciation")
        .filter_map(|item| item.alternatives.first())
        .filter_map(|alt| alt.confidence.as_deref())
        .filter_map(|c| c.parse::<f32>().ok())
        .collect();
    let confidence = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f32>() / scores.len() as f32
    };

    Ok(ParsedTranscript {
        text,
        confidence,
        language: output.results.language_code,
    })
}
