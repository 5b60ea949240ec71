//! Prompt construction for quiz generation.

use std::fmt::Write as _;

use indoc::formatdoc;
use serde::{Deserialize, Serialize};

use super::question::Question;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// What to ask the model for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    pub question_count: u32,
    pub difficulty: Difficulty,
    /// Output language, e.g. "Traditional Chinese".
    pub language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            question_count: 10,
            difficulty: Difficulty::Normal,
            language: "Traditional Chinese".into(),
        }
    }
}

/// Build the generation prompt.
///
/// `source` is the study material (may be empty when images carry the
/// content). `weak_spots` are recently missed questions to steer the model
/// toward the same concepts.
pub fn build_prompt(options: &PromptOptions, source: &str, weak_spots: &[Question]) -> String {
    let mut prompt = formatdoc! {r#"
        You are an experienced teacher. Write {count} multiple-choice questions in {language}
        based on the material provided. Difficulty: {difficulty}.

        Rules:
        1. Each question has exactly 4 options.
        2. "answer" must be the full text of one option, copied exactly, with no "A." style label.
        3. Include a detailed "explanation" for every question.
        4. Reply with a JSON array only, no extra prose:
        [
          {{
            "question": "question text",
            "options": ["option 1", "option 2", "option 3", "option 4"],
            "answer": "full text of the correct option",
            "explanation": "why the answer is correct"
          }}
        ]
        "#,
        count = options.question_count,
        language = options.language,
        difficulty = options.difficulty.as_str(),
    };

    if !weak_spots.is_empty() {
        prompt.push_str("\nThe learner previously got these questions wrong. Cover the same concepts from new angles:\n");
        for q in weak_spots {
            let _ = writeln!(prompt, "- {} (answer: {})", q.text, q.correct_answer);
        }
    }

    let source = source.trim();
    if !source.is_empty() {
        prompt.push_str("\nMaterial:\n");
        prompt.push_str(source);
        prompt.push('\n');
    }

    prompt
}
