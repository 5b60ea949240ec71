//! Question records and extraction from raw model output.
//!
//! The model is asked for a bare JSON array but routinely wraps it in a
//! Markdown fence or surrounds it with prose. Extraction strips fences, falls
//! back to the outermost `[...]` span, and then requires every question to
//! carry text, at least one option, and an answer field.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::QuizError;

/// One multiple-choice question as produced by the model.
///
/// `options` keeps the producer's order and may contain duplicates.
/// `correct_answer` is not guaranteed to match any option verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question", alias = "text")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(rename = "answer", alias = "correct_answer")]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            options,
            correct_answer: correct_answer.into(),
            explanation: String::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// Parse raw model output into questions.
///
/// # Errors
/// Returns [`QuizError::MalformedQuizData`] when no JSON array can be found,
/// the JSON does not match the question shape, or a question has empty text
/// or no options.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, QuizError> {
    let body = extract_json_array(raw).ok_or_else(|| {
        warn!(len = raw.len(), "model output contains no JSON array");
        QuizError::MalformedQuizData("no JSON array in model output".into())
    })?;

    let questions: Vec<Question> = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "model output did not match question shape");
        QuizError::MalformedQuizData(e.to_string())
    })?;

    for (i, q) in questions.iter().enumerate() {
        if q.text.trim().is_empty() {
            return Err(QuizError::MalformedQuizData(format!(
                "question {} has empty text",
                i + 1
            )));
        }
        if q.options.is_empty() {
            return Err(QuizError::MalformedQuizData(format!(
                "question {} has no options",
                i + 1
            )));
        }
    }

    Ok(questions)
}

fn extract_json_array(raw: &str) -> Option<&str> {
    let unfenced = strip_code_fence(raw.trim());
    if unfenced.starts_with('[') && unfenced.ends_with(']') {
        return Some(unfenced);
    }
    let start = unfenced.find('[')?;
    let end = unfenced.rfind(']')?;
    (start < end).then(|| &unfenced[start..=end])
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line.
    let rest = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
