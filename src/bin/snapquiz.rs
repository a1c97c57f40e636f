//! CLI binary for snapquiz.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, runs one screenshot through the pipeline and prints
//! or writes the results.

use anyhow::{Context, Result};
use clap::Parser;
use snapquiz::{
    render_pdf, render_word, ExtractionConfig, MemoryStore, Question, QuestionType, SnapQuiz,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract questions from a screenshot (plain text to stdout)
  snapquiz quiz.png

  # Save the extracted set as PDF and Word documents
  snapquiz quiz.png --pdf results.pdf --docx results.docx

  # Use a specific model
  snapquiz --model gpt-4.1 --provider openai exam-screenshot.jpg

  # JSON output for scripting
  snapquiz quiz.png --json > questions.json

  # Custom title and a tighter call timeout
  snapquiz quiz.png --title "Biology midterm" --api-timeout 30

SUPPORTED PROVIDERS & MODELS:
  Provider     Model                    Vision
  ─────────    ───────────────────────  ──────
  openai       gpt-4.1-nano (default)   ✓
  openai       gpt-4.1-mini, gpt-4.1    ✓
  anthropic    claude-sonnet-4-20250514 ✓
  gemini       gemini-2.0-flash         ✓
  ollama       llava, llama3.2-vision   ✓

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID

SETUP:
  1. Set API key:     export OPENAI_API_KEY=sk-...
  2. Extract:         snapquiz quiz.png --pdf results.pdf
"#;

/// Extract structured question sets from screenshots using Vision LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "snapquiz",
    version,
    about = "Extract structured question sets from screenshots using Vision LLMs",
    long_about = "Extract multiple-choice and open questions (with answers and explanations) \
from quiz screenshots using Vision Language Models, and export them as PDF or Word documents. \
Supports OpenAI, Anthropic, Google Gemini, and any OpenAI-compatible endpoint.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Screenshot image file (png, jpeg, gif, webp, bmp).
    input: PathBuf,

    /// Title for the extracted set. Default: "Uploaded Image: {filename}".
    #[arg(long)]
    title: Option<String>,

    /// Write the set as a PDF document to this path.
    #[arg(long, env = "SNAPQUIZ_PDF")]
    pdf: Option<PathBuf>,

    /// Write the set as a Word document to this path.
    #[arg(long, env = "SNAPQUIZ_DOCX")]
    docx: Option<PathBuf>,

    /// Output structured JSON instead of plain text.
    #[arg(long, env = "SNAPQUIZ_JSON")]
    json: bool,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1, claude-sonnet-4-20250514).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// Max LLM output tokens.
    #[arg(long, env = "SNAPQUIZ_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "SNAPQUIZ_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Vision call timeout in seconds.
    #[arg(long, env = "SNAPQUIZ_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Path to a text file containing a custom extraction prompt.
    #[arg(long, env = "SNAPQUIZ_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SNAPQUIZ_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the requested result.
    #[arg(short, long, env = "SNAPQUIZ_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and application ─────────────────────────────────────
    let config = build_config(&cli).await?;
    let app = SnapQuiz::new(config, Arc::new(MemoryStore::new()))
        .context("No LLM provider configured")?;

    // ── Run extraction ───────────────────────────────────────────────────
    let bytes = tokio::fs::read(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let filename = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    let mut set = app
        .process_upload(filename.as_deref(), bytes)
        .await
        .context("Extraction failed")?;
    if let Some(title) = cli.title.clone() {
        set.title = title;
    }

    // ── Output ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&set).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        print_set(&set);
    }

    if let Some(ref path) = cli.pdf {
        let pdf = render_pdf(&set).context("PDF rendering failed")?;
        tokio::fs::write(path, pdf)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} PDF  →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    if let Some(ref path) = cli.docx {
        let docx = render_word(&set).context("Word rendering failed")?;
        tokio::fs::write(path, docx)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} DOCX →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{} {} question(s) extracted",
            green("✔"),
            bold(&set.questions.len().to_string())
        );
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
async fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

/// Plain-text rendering of the set for the terminal.
fn print_set(set: &snapquiz::QuestionSet) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(out, "{}", bold(&set.title));
    let _ = writeln!(
        out,
        "{}",
        dim(&format!("Created: {}", set.created_at.format("%Y-%m-%d %H:%M")))
    );

    for (i, q) in set.questions.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", bold(&format!("{}. {}", i + 1, q.text)));
        print_question(&mut out, q);
    }
}

fn print_question(out: &mut impl Write, q: &Question) {
    if q.kind == QuestionType::MultipleChoice {
        for (j, opt) in q.options.iter().enumerate() {
            let label = char::from(b'A' + (j % 26) as u8);
            let _ = writeln!(out, "   {label}. {opt}");
        }
    }
    if !q.answer.is_empty() {
        let _ = writeln!(out, "{} {}", green("Answer:"), q.answer);
    }
    if !q.explanation.is_empty() {
        let _ = writeln!(out, "{} {}", dim("Explanation:"), q.explanation);
    }
}
