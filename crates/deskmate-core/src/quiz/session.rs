//! Quiz sessions: an explicit value holding questions and selected answers.
//!
//! Front ends own the session and drive it with [`QuizSession::submit_answer`]
//! and [`QuizSession::finalize`]; nothing here reads ambient state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grader::{grade_with, normalize, MatchMode};
use super::question::Question;
use crate::error::QuizError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    questions: Vec<Question>,
    /// Question index -> selected option text.
    answers: BTreeMap<usize, String>,
    mode: MatchMode,
}

/// Outcome of a single question after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub index: usize,
    pub question: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// Graded summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: usize,
    pub total: usize,
    pub results: Vec<QuestionResult>,
    /// Missed questions in presentation order, kept whole for the wrong pool.
    #[serde(skip)]
    missed: Vec<Question>,
}

impl ScoreReport {
    /// Questions graded incorrect, including unanswered ones.
    pub fn missed(&self) -> &[Question] {
        &self.missed
    }

    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}

impl QuizSession {
    /// Start a session over `questions` in presentation order.
    ///
    /// # Errors
    /// Returns [`QuizError::EmptyQuiz`] when `questions` is empty.
    pub fn new(questions: Vec<Question>, mode: MatchMode) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }
        Ok(Self {
            questions,
            answers: BTreeMap::new(),
            mode,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Record the selected option for question `index`, replacing any earlier
    /// selection.
    ///
    /// # Errors
    /// Returns [`QuizError::QuestionOutOfRange`] if `index` has no question.
    pub fn submit_answer(
        &mut self,
        index: usize,
        choice: impl Into<String>,
    ) -> Result<(), QuizError> {
        if index >= self.questions.len() {
            return Err(QuizError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        self.answers.insert(index, choice.into());
        Ok(())
    }

    /// Grade every question. Unanswered questions count as incorrect.
    pub fn finalize(&self) -> ScoreReport {
        let mut results = Vec::with_capacity(self.questions.len());
        let mut missed = Vec::new();

        for (index, q) in self.questions.iter().enumerate() {
            let selected = self.answers.get(&index).cloned();
            let is_correct = selected
                .as_deref()
                .is_some_and(|s| grade_with(s, &q.correct_answer, self.mode));
            if !is_correct {
                missed.push(q.clone());
            }
            results.push(QuestionResult {
                index,
                question: q.text.clone(),
                selected,
                correct_answer: q.correct_answer.clone(),
                is_correct,
                explanation: q.explanation.clone(),
            });
        }

        ScoreReport {
            score: results.iter().filter(|r| r.is_correct).count(),
            total: results.len(),
            results,
            missed,
        }
    }
}

/// Map typed input to option text.
///
/// Option text wins: an exact match first, then a match after label
/// stripping (`"4"` picks `"B. 4"`). Only when no option text matches is the
/// input read as a letter `A`-`Z` (either case) or a 1-based number, so
/// typing `4` among the options `3, 4, 5, 22` selects `4`, not `22`.
///
/// # Errors
/// Returns [`QuizError::UnknownChoice`] if the input names no option.
pub fn resolve_choice<'q>(question: &'q Question, input: &str) -> Result<&'q str, QuizError> {
    let input = input.trim();
    let unknown = || QuizError::UnknownChoice {
        input: input.to_string(),
        options: question.options.len(),
    };

    let by_text = question
        .options
        .iter()
        .find(|o| o.trim() == input)
        .or_else(|| {
            let wanted = normalize(input);
            question
                .options
                .iter()
                .find(|o| !wanted.is_empty() && normalize(o) == wanted)
        });
    if let Some(option) = by_text {
        return Ok(option.as_str());
    }

    let mut chars = input.chars();
    let index = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_uppercase() as u8).wrapping_sub(b'A') as usize)
        }
        _ => input.parse::<usize>().ok().and_then(|n| n.checked_sub(1)),
    };

    index
        .and_then(|i| question.options.get(i))
        .map(String::as_str)
        .ok_or_else(unknown)
}
