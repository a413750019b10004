use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use docquiz::generate::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use docquiz::pipeline::{self, Outcome, Progress, INSUFFICIENT_TEXT, NO_QUESTIONS, REMEDIATION_HINTS};
use docquiz::{document, GroqClient, Phase, Quiz, Settings};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(name = "docquiz")]
#[command(version)]
#[command(about = "Quiz yourself on the contents of a PDF", long_about = None)]
struct Cli {
    /// PDF to build the quiz from (asked for when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Minimum similarity (%) for an answer to count as correct
    #[arg(short, long, default_value_t = 70, value_parser = clap::value_parser!(u8).range(50..=90))]
    threshold: u8,

    /// Questions kept per section of the document
    #[arg(short = 'q', long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=5))]
    questions_per_chunk: u8,

    /// API key for the completion endpoint
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used to write the questions
    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "GROQ_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// A line typed at a prompt.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Next,
    Quit,
    Threshold(u32),
    PerChunk(u32),
    Invalid(String),
    Text(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Command::Text(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("n" | "next"), None) => Command::Next,
            (Some("q" | "quit"), None) => Command::Quit,
            (Some("threshold"), Some(value)) => match value.parse() {
                Ok(value) => Command::Threshold(value),
                Err(_) => Command::Invalid(format!("not a number: {}", value)),
            },
            (Some("per-chunk"), Some(value)) => match value.parse() {
                Ok(value) => Command::PerChunk(value),
                Err(_) => Command::Invalid(format!("not a number: {}", value)),
            },
            _ => Command::Invalid(format!("unknown command: {}", line)),
        }
    }
}

struct App {
    quiz: Quiz,
    settings: Settings,
    client: GroqClient,
    next_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let settings = Settings::new(cli.threshold, cli.questions_per_chunk)
        .context("invalid settings")?;
    let client = GroqClient::new(cli.api_key, &cli.model, &cli.base_url);
    log::info!("using model {}", client.model());

    let mut app = App {
        quiz: Quiz::new(),
        settings,
        client,
        next_file: cli.file,
    };

    println!("{}", "docquiz".bold());
    println!(
        "{}",
        "Commands: :next, :threshold N, :per-chunk N, :quit".dimmed()
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    while app.step(&mut input)? {}

    Ok(())
}

impl App {
    /// Handle one interaction. Returns `false` once the user is done.
    fn step(&mut self, input: &mut impl BufRead) -> anyhow::Result<bool> {
        match self.quiz.phase() {
            Phase::Empty | Phase::Failed => self.load_document(input),
            Phase::InProgress => self.ask(input),
            Phase::Complete => self.finish(input),
        }
    }

    fn load_document(&mut self, input: &mut impl BufRead) -> anyhow::Result<bool> {
        let path = match self.next_file.take() {
            Some(path) => path,
            None => match read_command(input, "PDF file")? {
                None | Some(Command::Quit) => return Ok(false),
                Some(Command::Text(path)) if !path.is_empty() => PathBuf::from(path),
                Some(command) => {
                    self.apply_setting(command);
                    return Ok(true);
                }
            },
        };

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                println!("{} {}: {}", "Error:".red(), path.display(), e);
                return Ok(true);
            }
        };

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Analyzing PDF content...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let result = pipeline::run(&self.client, &data, &self.settings, |progress| {
            match progress {
                Progress::Chunked { total } => {
                    spinner.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner} Generating questions [{bar:30}] {pos}/{len} sections")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("=> "),
                    );
                    spinner.set_length(total as u64);
                }
                Progress::ChunkDone { .. } => spinner.inc(1),
            }
        });
        spinner.finish_and_clear();

        match result {
            Ok(Outcome::Ready(questions)) => {
                println!("{} {} questions ready\n", "✓".green(), questions.len());
                self.quiz.load(questions)?;
            }
            Ok(Outcome::InsufficientText { extraction_error }) => {
                if let Some(e) = extraction_error {
                    println!("{} {}", "Error reading PDF:".red(), e);
                }
                println!("{}", document::LOW_TEXT_WARNING.yellow());
                println!("{}", INSUFFICIENT_TEXT.red());
            }
            Ok(Outcome::NoQuestions) => {
                self.quiz.load(Vec::new())?;
                println!("{}", NO_QUESTIONS.red());
                for hint in REMEDIATION_HINTS {
                    println!("  - {}", hint);
                }
            }
            Err(e) => {
                log::error!("generation failed: {:?}", e);
                println!("{} {}", "Question generation failed:".red(), e);
            }
        }
        Ok(true)
    }

    fn ask(&mut self, input: &mut impl BufRead) -> anyhow::Result<bool> {
        let (number, total) = self.quiz.position();
        let question = match self.quiz.current() {
            Some(question) => question.clone(),
            None => return Ok(true),
        };

        if self.quiz.evaluation().is_none() {
            println!("{}", format!("Question {} of {}", number, total).bold());
            println!("{}\n", question.question);
        }

        let label = if self.quiz.evaluation().is_some() {
            "Another answer, or :next"
        } else {
            "Your answer"
        };

        match read_command(input, label)? {
            None | Some(Command::Quit) => return Ok(false),
            Some(Command::Next) => {
                if let Err(e) = self.quiz.next() {
                    println!("{}", e.to_string().yellow());
                }
                println!();
            }
            Some(Command::Text(answer)) if answer.is_empty() => {
                if self.quiz.evaluation().is_some() {
                    self.quiz.next()?;
                    println!();
                }
            }
            Some(Command::Text(answer)) => {
                let evaluation = self
                    .quiz
                    .submit(&answer, self.settings.similarity_threshold())?;

                let bar = ProgressBar::new(100);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{bar:40.cyan/blue} {pos:>3}%")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar.set_position(u64::from(evaluation.similarity));
                bar.abandon();

                let verdict = if evaluation.correct {
                    "correct".green()
                } else {
                    "not quite".yellow()
                };
                println!(
                    "Your score: {}% ({})",
                    evaluation.similarity.to_string().bold(),
                    verdict
                );
                if !evaluation.correct && evaluation.distance > 0 {
                    println!("{} characters off", evaluation.distance);
                }
                println!("Correct answer: {}", question.answer.bold());
            }
            Some(command) => self.apply_setting(command),
        }
        Ok(true)
    }

    fn finish(&mut self, input: &mut impl BufRead) -> anyhow::Result<bool> {
        let state = self.quiz.state();
        println!(
            "{} Quiz Complete! Final Score: {}/{}",
            "🎉".bold(),
            state.score.to_string().bold(),
            state.questions.len()
        );

        match read_command(input, "Start a new quiz? [y/N]")? {
            Some(Command::Text(answer)) if answer.eq_ignore_ascii_case("y") => {
                self.quiz.restart();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn apply_setting(&mut self, command: Command) {
        let result = match command {
            Command::Threshold(value) => self.settings.set_similarity_threshold(value),
            Command::PerChunk(value) => self.settings.set_questions_per_chunk(value),
            Command::Invalid(message) => {
                println!("{}", message.yellow());
                return;
            }
            _ => return,
        };

        match result {
            Ok(()) => println!(
                "threshold {}%, {} questions per section",
                self.settings.similarity_threshold(),
                self.settings.questions_per_chunk()
            ),
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }
}

/// Prompt and read one line; `None` at end of input.
fn read_command(input: &mut impl BufRead, label: &str) -> anyhow::Result<Option<Command>> {
    print!("{} ", format!("{}>", label).cyan());
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(Command::parse(&line)))
}
