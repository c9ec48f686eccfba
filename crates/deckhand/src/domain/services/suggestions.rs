//! Quick-reply suggestion extraction
//!
//! Replies end with a marker line `SUGGESTIONS: ["a", "b", "c"]`. The
//! marker is stripped from the text shown to the user and its array
//! becomes UI quick-reply hints. A missing or malformed marker leaves the
//! text untouched.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum number of quick replies surfaced to the UI
pub const MAX_SUGGESTIONS: usize = 3;

/// Reply text split into display text and quick replies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl Reply {
    fn plain(text: &str) -> Self {
        Self {
            message: text.to_string(),
            suggestions: Vec::new(),
        }
    }
}

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*SUGGESTIONS:[ \t]*(\[.*\])\s*\z").expect("valid marker pattern")
    })
}

/// Split `text` into the cleaned message and its suggestions
///
/// Only a marker on the last line counts. Fewer than three suggestions
/// are dropped, more are truncated.
pub fn extract_suggestions(text: &str) -> Reply {
    let Some(captures) = marker().captures(text) else {
        return Reply::plain(text);
    };

    match serde_json::from_str::<Vec<String>>(&captures[1]) {
        Ok(mut suggestions) => {
            if suggestions.len() < MAX_SUGGESTIONS {
                suggestions.clear();
            }
            suggestions.truncate(MAX_SUGGESTIONS);
            let start = captures.get(0).map_or(text.len(), |m| m.start());
            Reply {
                message: text[..start].trim().to_string(),
                suggestions,
            }
        }
        Err(e) => {
            tracing::debug!("Ignoring malformed suggestions marker: {}", e);
            Reply::plain(text)
        }
    }
}
