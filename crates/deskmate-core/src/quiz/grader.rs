//! Answer normalization and grading.
//!
//! Both the user's selected option and the model's correct answer pass
//! through [`normalize`] before comparison. Tolerant mode additionally accepts
//! either normalized string being a substring of the other. In every mode an
//! answer that normalizes to empty never earns credit.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How strictly answers are compared after normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Normalized equality, falling back to substring containment.
    #[default]
    Tolerant,
    /// Normalized equality only.
    Exact,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tolerant" => Ok(MatchMode::Tolerant),
            "exact" => Ok(MatchMode::Exact),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

fn is_label(c: char) -> bool {
    matches!(c, 'A'..='D')
}

fn is_label_separator(c: char) -> bool {
    matches!(c, '.' | ')' | '-') || c.is_whitespace()
}

/// Strip a leading option label (`A.`, `B)`, `C-`, `D `) and surrounding
/// whitespace.
///
/// The label must be a single uppercase A-D immediately followed by at least
/// one separator; every separator character after it is consumed. A bare
/// `"A"` or a word such as `"Apple"` is left alone.
pub fn normalize(answer: &str) -> &str {
    let trimmed = answer.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(label), Some(sep)) if is_label(label) && is_label_separator(sep) => {
            trimmed[label.len_utf8()..]
                .trim_start_matches(is_label_separator)
                .trim()
        }
        _ => trimmed,
    }
}

/// Grade a selected option against the correct answer in tolerant mode.
pub fn grade(selected: &str, correct: &str) -> bool {
    grade_with(selected, correct, MatchMode::Tolerant)
}

/// Grade a selected option against the correct answer.
pub fn grade_with(selected: &str, correct: &str, mode: MatchMode) -> bool {
    let selected = normalize(selected);
    let correct = normalize(correct);

    if selected.is_empty() || correct.is_empty() {
        return false;
    }
    if selected == correct {
        return true;
    }

    match mode {
        MatchMode::Exact => false,
        MatchMode::Tolerant => {
            let contained = correct.contains(selected) || selected.contains(correct);
            if contained {
                debug!(selected, correct, "graded correct by substring fallback");
            }
            contained
        }
    }
}
