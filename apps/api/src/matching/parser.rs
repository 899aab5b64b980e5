//! Match percentage extraction from free-text model output.
//!
//! The model is asked for a "Match percentage" but answers in prose, so the score is
//! located by a literal marker: the first `Match percentage:` in the text, followed by
//! the next whitespace-delimited token before any later marker, read as a float.
//! Anything else (marker missing, nothing after it, token not a finite number) is
//! `Unparseable`, which the evaluator turns into the `Error in processing` sentinel
//! instead of an error.

use crate::models::candidate::{STATUS_PROCESSING_ERROR, STATUS_SHORTLISTED, STATUS_UNDER_REVIEW};

pub const MATCH_MARKER: &str = "Match percentage:";

/// Scores at or above this are shortlisted.
pub const SHORTLIST_THRESHOLD: f64 = 75.0;

/// Outcome of reading the match percentage out of a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreExtraction {
    Parsed { value: f64 },
    Unparseable { reason: String },
}

pub fn extract_match_percentage(response: &str) -> ScoreExtraction {
    let Some(start) = response.find(MATCH_MARKER) else {
        return ScoreExtraction::Unparseable {
            reason: format!("marker '{MATCH_MARKER}' not found"),
        };
    };

    let after = &response[start + MATCH_MARKER.len()..];
    let after = match after.find(MATCH_MARKER) {
        Some(next) => &after[..next],
        None => after,
    };
    let Some(token) = after.split_whitespace().next() else {
        return ScoreExtraction::Unparseable {
            reason: format!("nothing follows '{MATCH_MARKER}'"),
        };
    };

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => ScoreExtraction::Parsed { value },
        _ => ScoreExtraction::Unparseable {
            reason: format!("token '{token}' is not a number"),
        },
    }
}

/// Maps an extraction to the persisted (score, status) pair.
pub fn classify(extraction: &ScoreExtraction) -> (f64, &'static str) {
    match extraction {
        ScoreExtraction::Parsed { value } if *value >= SHORTLIST_THRESHOLD => {
            (*value, STATUS_SHORTLISTED)
        }
        ScoreExtraction::Parsed { value } => (*value, STATUS_UNDER_REVIEW),
        ScoreExtraction::Unparseable { .. } => (0.0, STATUS_PROCESSING_ERROR),
    }
}
