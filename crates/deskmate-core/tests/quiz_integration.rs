//! Integration tests for the quiz workflow.
//!
//! Covers the path from raw model output through grading to remedial rounds
//! built from the wrong-answer pool.

use deskmate_core::quiz::{parse_questions, resolve_choice};
use deskmate_core::{MatchMode, QuizError, QuizSession, WrongPool};

const MODEL_OUTPUT: &str = r#"```json
[
  {"question": "Capital of France?", "options": ["A. Paris", "B. Rome", "C. Berlin", "D. Madrid"], "answer": "Paris", "explanation": "Paris."},
  {"question": "2 + 2?", "options": ["3", "4", "5", "22"], "answer": "B) 4", "explanation": "Arithmetic."},
  {"question": "Largest planet?", "options": ["Mars", "Jupiter", "Venus", "Earth"], "answer": "The planet Jupiter", "explanation": "Gas giant."}
]
```"#;

#[test]
fn test_full_quiz_workflow() {
    let questions = parse_questions(MODEL_OUTPUT).unwrap();
    let mut session = QuizSession::new(questions, MatchMode::Tolerant).unwrap();

    // Labels on either side and a looser answer phrasing all grade correct.
    session.submit_answer(0, "A. Paris").unwrap();
    session.submit_answer(1, "4").unwrap();
    session.submit_answer(2, "Mars").unwrap();

    let report = session.finalize();
    assert_eq!(report.score, 2);
    assert_eq!(report.total, 3);
    assert_eq!(report.missed().len(), 1);

    let mut pool = WrongPool::new();
    pool.record_misses(&report);
    assert_eq!(pool.len(), 1);

    let mut remedial = pool.remedial_session(10, MatchMode::Tolerant).unwrap();
    assert_eq!(remedial.len(), 1);
    let choice = resolve_choice(&remedial.questions()[0], "B").unwrap().to_string();
    remedial.submit_answer(0, choice).unwrap();
    assert!(remedial.finalize().is_perfect());
}

#[test]
fn test_exact_mode_is_stricter() {
    let questions = parse_questions(MODEL_OUTPUT).unwrap();
    let mut session = QuizSession::new(questions, MatchMode::Exact).unwrap();
    session.submit_answer(0, "A. Paris").unwrap();
    session.submit_answer(1, "4").unwrap();
    session.submit_answer(2, "Jupiter").unwrap();

    // "Jupiter" vs "The planet Jupiter" needs the substring fallback.
    assert_eq!(session.finalize().score, 2);
}

#[test]
fn test_malformed_output_is_recoverable() {
    let err = parse_questions("The model is overloaded, try again later.").unwrap_err();
    assert!(matches!(err, QuizError::MalformedQuizData(_)));

    // A later good response still works; nothing was poisoned.
    assert_eq!(parse_questions(MODEL_OUTPUT).unwrap().len(), 3);
}

#[test]
fn test_session_survives_serialization() {
    let questions = parse_questions(MODEL_OUTPUT).unwrap();
    let mut session = QuizSession::new(questions, MatchMode::Tolerant).unwrap();
    session.submit_answer(1, "4").unwrap();

    let json = serde_json::to_string(&session).unwrap();
    let restored: QuizSession = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.answer(1), Some("4"));
    assert_eq!(restored.finalize().score, 1);
}

#[test]
fn test_pool_accumulates_across_sessions() {
    let questions = parse_questions(MODEL_OUTPUT).unwrap();
    let mut pool = WrongPool::new();

    for _ in 0..3 {
        let session = QuizSession::new(questions.clone(), MatchMode::Tolerant).unwrap();
        pool.record_misses(&session.finalize());
    }
    // All three unanswered every time, deduplicated by text.
    assert_eq!(pool.len(), 3);
    assert_eq!(pool.context(2).len(), 2);
    assert_eq!(pool.context(2)[1].text, "Largest planet?");
}
