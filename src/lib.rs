//! # snapquiz
//!
//! Extract structured question sets from screenshots using Vision Language
//! Models (VLMs).
//!
//! ## Why this crate?
//!
//! Screenshots of quizzes, exam prep sheets, and practice tests are
//! unstructured pixels. OCR alone recovers characters but not *meaning* —
//! which lines are the question, which are options, which option is the
//! answer. Instead this crate ships the screenshot to a VLM and then parses
//! the model's free-form textual answer into typed [`Question`] records,
//! robust to the formatting drift that free-form model output exhibits.
//!
//! ## Pipeline Overview
//!
//! ```text
//! screenshot (upload / pasted base64)
//!  │
//!  ├─ 1. Normalize  canonical bytes + media type
//!  ├─ 2. Extract    one vision call to gpt-4.1-nano / claude / gemini / …
//!  ├─ 3. Parse      free-form model text → ordered Vec<Question>
//!  ├─ 4. Assemble   titled, timestamped QuestionSet aggregate
//!  └─ 5. Render     on demand: PDF (printpdf) or Word (docx-rs) bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snapquiz::{ExtractionConfig, MemoryStore, SnapQuiz};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let app = SnapQuiz::new(ExtractionConfig::default(), std::sync::Arc::new(MemoryStore::new()))?;
//!     let bytes = std::fs::read("quiz.png")?;
//!     let set = app.process_upload(Some("quiz.png"), bytes).await?;
//!     println!("{}: {} questions", set.title, set.questions.len());
//!     let export = app.export_pdf(set.id)?;
//!     std::fs::write(&export.filename, &export.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `snapquiz` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! snapquiz = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod service;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::SnapQuizError;
pub use model::{Question, QuestionSet, QuestionType};
pub use pipeline::assemble::{assemble, upload_title, PASTED_IMAGE_TITLE};
pub use pipeline::normalize::{normalize, ImageInput, NormalizedImage};
pub use pipeline::parse::parse;
pub use render::{render_pdf, render_word};
pub use service::{Export, SnapQuiz, DOCX_CONTENT_TYPE, PDF_CONTENT_TYPE};
pub use store::{MemoryStore, QuestionSetStore};
