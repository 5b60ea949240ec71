//! Wrong-answer pool: previously missed questions kept for the lifetime of an
//! interactive process.
//!
//! Questions are deduplicated by text. Order is recency: the back of the pool
//! is the most recently missed question.

use serde::{Deserialize, Serialize};

use super::grader::MatchMode;
use super::question::Question;
use super::session::{QuizSession, ScoreReport};
use crate::error::QuizError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WrongPool {
    questions: Vec<Question>,
}

impl WrongPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn clear(&mut self) {
        self.questions.clear();
    }

    /// Add one missed question. A question already in the pool moves to the
    /// most-recent end and takes the newer content.
    pub fn record(&mut self, question: Question) {
        self.questions.retain(|q| q.text != question.text);
        self.questions.push(question);
    }

    /// Add every question the report marks as missed. Returns the pool size.
    pub fn record_misses(&mut self, report: &ScoreReport) -> usize {
        for q in report.missed() {
            self.record(q.clone());
        }
        self.questions.len()
    }

    /// The `n` most recently missed questions, oldest first.
    pub fn context(&self, n: usize) -> &[Question] {
        let start = self.questions.len().saturating_sub(n);
        &self.questions[start..]
    }

    /// Build a remedial session from the `size` most recently missed questions.
    ///
    /// # Errors
    /// Returns [`QuizError::EmptyQuiz`] when the pool is empty or `size` is 0.
    pub fn remedial_session(&self, size: usize, mode: MatchMode) -> Result<QuizSession, QuizError> {
        QuizSession::new(self.context(size).to_vec(), mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, answer: &str) -> Question {
        Question::new(text, vec![answer.into(), "other".into()], answer)
    }

    #[test]
    fn dedupes_by_text_and_refreshes_recency() {
        let mut pool = WrongPool::new();
        pool.record(q("one", "1"));
        pool.record(q("two", "2"));
        pool.record(q("one", "uno"));

        assert_eq!(pool.len(), 2);
        let texts: Vec<_> = pool.context(10).iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["two", "one"]);
        assert_eq!(pool.context(1)[0].correct_answer, "uno");
    }

    #[test]
    fn context_is_capped_to_most_recent() {
        let mut pool = WrongPool::new();
        for i in 0..8 {
            pool.record(q(&format!("q{i}"), "a"));
        }
        let ctx = pool.context(3);
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx[0].text, "q5");
        assert_eq!(ctx[2].text, "q7");
        assert!(pool.context(0).is_empty());
    }

    #[test]
    fn records_misses_from_report() {
        let mut session = QuizSession::new(
            vec![q("a?", "a"), q("b?", "b"), q("c?", "c")],
            MatchMode::Tolerant,
        )
        .unwrap();
        session.submit_answer(0, "a").unwrap();
        session.submit_answer(1, "other").unwrap();

        let mut pool = WrongPool::new();
        assert_eq!(pool.record_misses(&session.finalize()), 2);
        // Missing the same questions again does not grow the pool.
        assert_eq!(pool.record_misses(&session.finalize()), 2);
    }

    #[test]
    fn remedial_session_uses_retrieval_size() {
        let mut pool = WrongPool::new();
        assert_eq!(
            pool.remedial_session(5, MatchMode::Tolerant).unwrap_err(),
            QuizError::EmptyQuiz
        );
        for i in 0..4 {
            pool.record(q(&format!("q{i}"), "a"));
        }
        let session = pool.remedial_session(2, MatchMode::Exact).unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.mode(), MatchMode::Exact);
        assert_eq!(session.questions()[1].text, "q3");
    }
}
