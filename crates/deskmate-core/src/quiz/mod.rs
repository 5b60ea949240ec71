//! AI quiz support: model output parsing, answer grading, sessions and the
//! wrong-answer pool.

pub mod generator;
pub mod grader;
pub mod prompt;
pub mod question;
pub mod session;
pub mod wrong_pool;

pub use generator::{GeminiClient, GenerationRequest, QuizGenerator};
pub use grader::{grade, grade_with, normalize, MatchMode};
pub use prompt::{build_prompt, Difficulty, PromptOptions};
pub use question::{parse_questions, Question};
pub use session::{resolve_choice, QuestionResult, QuizSession, ScoreReport};
pub use wrong_pool::WrongPool;
