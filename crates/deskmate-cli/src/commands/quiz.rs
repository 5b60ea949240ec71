use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;
use deskmate_core::quiz::{
    parse_questions, resolve_choice, Difficulty, GeminiClient, GenerationRequest, QuizGenerator,
};
use deskmate_core::{grade_with, Config, MatchMode, Question, QuizSession, ScoreReport, WrongPool};

#[derive(Subcommand)]
pub enum QuizAction {
    /// Generate questions from study material
    Generate {
        /// Text file with study material
        #[arg(long)]
        source: Option<PathBuf>,
        /// Photo of study material (repeatable)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
        /// Number of questions (default: quiz.question_count)
        #[arg(long)]
        count: Option<u32>,
        /// easy, normal or hard (default: quiz.difficulty)
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Write the question JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Take a quiz from a question JSON file
    Take {
        /// Question JSON (raw model output is accepted too)
        file: PathBuf,
        /// Comma-separated answers: letters, 1-based numbers or option text.
        /// Leave an entry empty to skip a question.
        #[arg(long, value_delimiter = ',')]
        answers: Option<Vec<String>>,
        /// Require exact answer text
        #[arg(long)]
        exact: bool,
        /// Output the score report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate, take and retry quizzes until you quit
    Study {
        #[arg(long)]
        source: Option<PathBuf>,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
        #[arg(long)]
        exact: bool,
    },
    /// Check one answer against the correct answer
    Grade {
        selected: String,
        correct: String,
        #[arg(long)]
        exact: bool,
    },
}

pub fn run(action: QuizAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        QuizAction::Generate {
            source,
            images,
            count,
            difficulty,
            out,
        } => {
            let config = Config::load()?;
            let request = build_request(&config, source.as_deref(), images, count, difficulty)?;
            let questions = generate(&config, &request)?;
            let json = serde_json::to_string_pretty(&questions)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json + "\n")?;
                    println!("{} questions written to {}", questions.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        QuizAction::Take {
            file,
            answers,
            exact,
            json,
        } => {
            let config = Config::load()?;
            let mode = match_mode(&config, exact);
            let raw = std::fs::read_to_string(&file)?;
            let mut session = QuizSession::new(parse_questions(&raw)?, mode)?;

            match answers {
                Some(answers) => {
                    fill_answers(&mut session, &answers)?;
                    let report = session.finalize();
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        print_report(&report);
                    }
                }
                None => {
                    let mut input = io::stdin().lock();
                    let report = answer_interactively(&mut session, &mut input)?;
                    print_report(&report);
                    let mut pool = WrongPool::new();
                    pool.record_misses(&report);
                    remedial_rounds(&mut pool, &config, mode, &mut input)?;
                }
            }
        }
        QuizAction::Study {
            source,
            images,
            count,
            difficulty,
            exact,
        } => {
            let config = Config::load()?;
            let mode = match_mode(&config, exact);
            let mut request = build_request(&config, source.as_deref(), images, count, difficulty)?;
            let mut pool = WrongPool::new();
            let mut input = io::stdin().lock();

            loop {
                request.weak_spots = pool.context(config.quiz.wrong_pool_context).to_vec();
                let mut session = QuizSession::new(generate(&config, &request)?, mode)?;
                let report = answer_interactively(&mut session, &mut input)?;
                print_report(&report);
                pool.record_misses(&report);

                remedial_rounds(&mut pool, &config, mode, &mut input)?;
                if !confirm("Generate a new quiz?", &mut input)? {
                    break;
                }
            }
        }
        QuizAction::Grade {
            selected,
            correct,
            exact,
        } => {
            let mode = if exact {
                MatchMode::Exact
            } else {
                MatchMode::Tolerant
            };
            println!("{}", grade_with(&selected, &correct, mode));
        }
    }
    Ok(())
}

fn match_mode(config: &Config, exact: bool) -> MatchMode {
    if exact {
        MatchMode::Exact
    } else {
        config.quiz.match_mode
    }
}

fn build_request(
    config: &Config,
    source: Option<&Path>,
    images: Vec<PathBuf>,
    count: Option<u32>,
    difficulty: Option<Difficulty>,
) -> Result<GenerationRequest, Box<dyn std::error::Error>> {
    if source.is_none() && images.is_empty() {
        return Err("provide --source and/or at least one --image".into());
    }
    let source = match source {
        Some(path) => std::fs::read_to_string(path)?,
        None => String::new(),
    };

    let mut options = config.quiz.prompt_options();
    if let Some(count) = count {
        options.question_count = count;
    }
    if let Some(difficulty) = difficulty {
        options.difficulty = difficulty;
    }

    Ok(GenerationRequest {
        options,
        source,
        images,
        weak_spots: Vec::new(),
    })
}

fn generate(
    config: &Config,
    request: &GenerationRequest,
) -> Result<Vec<Question>, Box<dyn std::error::Error>> {
    let client = GeminiClient::from_config(&config.model)?;
    tracing::info!(model = client.model(), "generating quiz");
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(client.generate(request))?)
}

/// Apply `--answers` positionally. Blank entries leave the question unanswered.
fn fill_answers(
    session: &mut QuizSession,
    answers: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    if answers.len() > session.len() {
        return Err(format!(
            "{} answers given for {} questions",
            answers.len(),
            session.len()
        )
        .into());
    }
    for (index, input) in answers.iter().enumerate() {
        if input.trim().is_empty() {
            continue;
        }
        let choice = resolve_choice(&session.questions()[index], input)?.to_string();
        session.submit_answer(index, &choice)?;
    }
    Ok(())
}

/// Ask every question on `input`. A blank line skips; end of input stops asking.
fn answer_interactively(
    session: &mut QuizSession,
    input: &mut impl BufRead,
) -> Result<ScoreReport, Box<dyn std::error::Error>> {
    let total = session.len();
    'questions: for index in 0..total {
        let question = session.questions()[index].clone();
        println!();
        println!("Q{}/{total}. {}", index + 1, question.text);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}. {option}", option_label(i));
        }

        loop {
            let Some(line) = read_line("> ", input)? else {
                break 'questions;
            };
            if line.is_empty() {
                break;
            }
            match resolve_choice(&question, &line) {
                Ok(choice) => {
                    session.submit_answer(index, choice)?;
                    break;
                }
                Err(e) => eprintln!("{e}"),
            }
        }
    }
    Ok(session.finalize())
}

fn remedial_rounds(
    pool: &mut WrongPool,
    config: &Config,
    mode: MatchMode,
    input: &mut impl BufRead,
) -> Result<(), Box<dyn std::error::Error>> {
    while !pool.is_empty() {
        let prompt = format!("Retry missed questions ({} in pool)?", pool.len());
        if !confirm(&prompt, input)? {
            break;
        }
        let mut session = pool.remedial_session(config.quiz.remedial_size, mode)?;
        let report = answer_interactively(&mut session, input)?;
        print_report(&report);
        pool.record_misses(&report);
    }
    Ok(())
}

fn print_report(report: &ScoreReport) {
    println!();
    for result in &report.results {
        let mark = if result.is_correct { "✓" } else { "✗" };
        println!("{mark} Q{}. {}", result.index + 1, result.question);
        if !result.is_correct {
            let selected = result.selected.as_deref().unwrap_or("(no answer)");
            println!("    your answer: {selected}");
            println!("    correct:     {}", result.correct_answer);
        }
        if !result.explanation.is_empty() {
            println!("    {}", result.explanation);
        }
    }
    println!();
    println!("Score: {} / {}", report.score, report.total);
}

fn option_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

fn confirm(prompt: &str, input: &mut impl BufRead) -> io::Result<bool> {
    let answer = read_line(&format!("{prompt} [y/N] "), input)?;
    Ok(matches!(answer.as_deref(), Some("y" | "Y" | "yes")))
}

fn read_line(prompt: &str, input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
