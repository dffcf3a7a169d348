use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The kinds of document the pipeline can produce.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DocumentType {
    Flyer,
    Announcement,
    Notice,
    Event,
    MeetingMinutes,
    Letter,
    Report,
}

impl DocumentType {
    pub const ALL: [DocumentType; 7] = [
        DocumentType::Flyer,
        DocumentType::Announcement,
        DocumentType::Notice,
        DocumentType::Event,
        DocumentType::MeetingMinutes,
        DocumentType::Letter,
        DocumentType::Report,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Flyer => "flyer",
            DocumentType::Announcement => "announcement",
            DocumentType::Notice => "notice",
            DocumentType::Event => "event",
            DocumentType::MeetingMinutes => "meeting_minutes",
            DocumentType::Letter => "letter",
            DocumentType::Report => "report",
        }
    }

    /// Human-readable name, used for default titles.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Flyer => "Flyer",
            DocumentType::Announcement => "Announcement",
            DocumentType::Notice => "Notice",
            DocumentType::Event => "Event",
            DocumentType::MeetingMinutes => "Meeting Minutes",
            DocumentType::Letter => "Letter",
            DocumentType::Report => "Report",
        }
    }

    /// Words in an instruction that indicate this document type.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            DocumentType::Flyer => &["flyer", "flier", "poster", "leaflet"],
            DocumentType::Announcement => &["announcement", "announce"],
            DocumentType::Notice => &["notice", "notification", "bulletin"],
            DocumentType::Event => &["event", "invitation", "invite"],
            DocumentType::MeetingMinutes => &["minutes", "meeting notes"],
            DocumentType::Letter => &["letter"],
            DocumentType::Report => &["report"],
        }
    }

    /// Document types `text` asks to switch to, in declaration order.
    ///
    /// A keyword only counts when it follows change-intent phrasing such as
    /// "make it a formal letter" or "convert it to an invitation", so "make
    /// the event title bigger" requests nothing. Single-word keywords match
    /// whole words only; multi-word keywords match as a phrase.
    pub fn requested_by(text: &str) -> Vec<DocumentType> {
        let targets = change_targets(text);
        DocumentType::ALL
            .into_iter()
            .filter(|doc_type| {
                doc_type.keywords().iter().any(|kw| {
                    targets.iter().any(|window| {
                        if kw.contains(' ') {
                            window.join(" ").contains(kw)
                        } else {
                            window.iter().any(|w| w == kw)
                        }
                    })
                })
            })
            .collect()
    }
}

const CHANGE_VERBS: [&str; 5] = ["turn", "convert", "change", "switch", "transform"];
const POINTERS: [&str; 3] = ["it", "this", "that"];
const TARGET_WINDOW: usize = 4;
const WINDOW_BREAKS: [&str; 14] = [
    "for", "of", "in", "on", "at", "with", "to", "about", "and", "but", "so", "by", "from",
    "because",
];

/// Lowercased word windows that follow change-intent phrasing in `text`.
///
/// Recognized forms: "make it|this|that ...", "as a|an ...",
/// "<verb> [it|this|that] to ..." and "<verb> ... into ..." where the
/// verb is one of `CHANGE_VERBS`. A window holds at most
/// `TARGET_WINDOW` words and ends early at a preposition or conjunction.
pub fn change_targets(text: &str) -> Vec<Vec<String>> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .collect();
    let at = |i: usize| words.get(i).copied().unwrap_or("");

    let mut windows = Vec::new();
    for i in 0..words.len() {
        let start = if at(i) == "make" && POINTERS.contains(&at(i + 1)) {
            Some(i + 2)
        } else if at(i) == "as" && matches!(at(i + 1), "a" | "an") {
            Some(i + 1)
        } else if CHANGE_VERBS.contains(&at(i)) {
            let to = if at(i + 1) == "to" {
                Some(i + 2)
            } else if POINTERS.contains(&at(i + 1)) && at(i + 2) == "to" {
                Some(i + 3)
            } else {
                None
            };
            to.or_else(|| {
                (i + 1..=i + 5)
                    .find(|&j| at(j) == "into")
                    .map(|j| j + 1)
            })
        } else {
            None
        };

        if let Some(start) = start {
            let window: Vec<String> = words
                .iter()
                .skip(start)
                .take(TARGET_WINDOW)
                .take_while(|w| !WINDOW_BREAKS.contains(w))
                .map(|w| w.to_string())
                .collect();
            if !window.is_empty() {
                windows.push(window);
            }
        }
    }
    windows
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = CoreError;

    /// Accepts `meeting_minutes`, `meeting-minutes` and `Meeting Minutes`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| CoreError::UnsupportedDocumentType(s.to_string()))
    }
}
