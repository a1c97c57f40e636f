//! Application facade: the full screenshot-to-export workflow behind one
//! type.
//!
//! [`SnapQuiz`] wires the pipeline stages to a [`QuestionSetStore`] and
//! exposes one method per user-facing operation: process an uploaded file,
//! process a pasted image, list history, fetch one set, export PDF or
//! Word. An HTTP layer (or the bundled CLI) maps its endpoints onto these
//! methods one-to-one and stays free of domain logic.

use crate::config::ExtractionConfig;
use crate::error::SnapQuizError;
use crate::model::QuestionSet;
use crate::pipeline::assemble::{assemble, upload_title, PASTED_IMAGE_TITLE};
use crate::pipeline::extract::extract_text;
use crate::pipeline::normalize::{normalize, ImageInput};
use crate::pipeline::parse::parse;
use crate::render::{render_pdf, render_word};
use crate::store::QuestionSetStore;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::{debug, info};

/// MIME type of PDF exports.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// MIME type of Word (OpenXML) exports.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A rendered document ready to hand to a download response.
#[derive(Debug, Clone)]
pub struct Export {
    pub bytes: Vec<u8>,
    /// Suggested attachment filename, e.g. `mcq-results-7.pdf`.
    pub filename: String,
    pub content_type: &'static str,
}

/// The assembled application: provider + store + config.
pub struct SnapQuiz {
    provider: Arc<dyn LLMProvider>,
    store: Arc<dyn QuestionSetStore>,
    config: ExtractionConfig,
}

impl SnapQuiz {
    /// Build the application, resolving the LLM provider from the config
    /// (and, failing that, from the environment).
    ///
    /// Fails with [`SnapQuizError::ProviderNotConfigured`] when no provider
    /// can be resolved.
    pub fn new(
        config: ExtractionConfig,
        store: Arc<dyn QuestionSetStore>,
    ) -> Result<Self, SnapQuizError> {
        let provider = resolve_provider(&config)?;
        Ok(Self {
            provider,
            store,
            config,
        })
    }

    /// Build the application around a pre-constructed provider, skipping
    /// resolution entirely. Intended for tests and custom middleware.
    pub fn with_provider(
        config: ExtractionConfig,
        provider: Arc<dyn LLMProvider>,
        store: Arc<dyn QuestionSetStore>,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Extract questions from an uploaded image file and persist the result.
    ///
    /// The set is titled `"Uploaded Image: {filename}"` (`Unnamed` when the
    /// upload carries no filename). Returns the persisted set, identifier
    /// assigned.
    pub async fn process_upload(
        &self,
        filename: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<QuestionSet, SnapQuizError> {
        self.process(
            ImageInput::Upload {
                filename: filename.map(str::to_owned),
                bytes,
            },
            upload_title(filename),
        )
        .await
    }

    /// Extract questions from a pasted (clipboard) image supplied as base64,
    /// with or without a `data:` URL prefix, and persist the result.
    pub async fn process_pasted_image(
        &self,
        base64_payload: impl Into<String>,
    ) -> Result<QuestionSet, SnapQuizError> {
        self.process(
            ImageInput::Base64(base64_payload.into()),
            PASTED_IMAGE_TITLE.to_owned(),
        )
        .await
    }

    async fn process(
        &self,
        input: ImageInput,
        title: String,
    ) -> Result<QuestionSet, SnapQuizError> {
        info!("Processing '{title}'");
        let image = normalize(input)?;
        let raw = extract_text(&self.provider, &image, &self.config).await?;
        debug!("Model returned {} chars", raw.len());
        let questions = parse(&raw);
        let set = assemble(title, questions)?;

        let id = self.store.save(set);
        // Read back so the caller sees the assigned identifier.
        self.store
            .get(id)
            .ok_or_else(|| SnapQuizError::Internal("saved set vanished from store".into()))
    }

    /// All persisted sets, newest first.
    pub fn history(&self) -> Vec<QuestionSet> {
        self.store.history()
    }

    /// One persisted set by identifier.
    pub fn question_set(&self, id: u64) -> Result<QuestionSet, SnapQuizError> {
        self.store.get(id).ok_or(SnapQuizError::NotFound { id })
    }

    /// Render a persisted set as a downloadable PDF.
    pub fn export_pdf(&self, id: u64) -> Result<Export, SnapQuizError> {
        let set = self.question_set(id)?;
        Ok(Export {
            bytes: render_pdf(&set)?,
            filename: format!("mcq-results-{id}.pdf"),
            content_type: PDF_CONTENT_TYPE,
        })
    }

    /// Render a persisted set as a downloadable Word document.
    pub fn export_word(&self, id: u64) -> Result<Export, SnapQuizError> {
        let set = self.question_set(id)?;
        Ok(Export {
            bytes: render_word(&set)?,
            filename: format!("mcq-results-{id}.docx"),
            content_type: DOCX_CONTENT_TYPE,
        })
    }

    /// Delete a persisted set (and every question it owns). Returns whether
    /// anything was deleted.
    pub fn delete_question_set(&self, id: u64) -> bool {
        self.store.delete(id)
    }
}

fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, SnapQuizError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        SnapQuizError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is.
/// 2. **Provider name** (`config.provider_name`) + configured or default
///    model.
/// 3. **`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`** when both are set
///    and non-empty.
/// 4. **Environment auto-detection**, preferring OpenAI when
///    `OPENAI_API_KEY` is present so multi-key environments stay
///    deterministic.
fn resolve_provider(config: &ExtractionConfig) -> Result<Arc<dyn LLMProvider>, SnapQuizError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
        return create_vision_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
            return create_vision_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| SnapQuizError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::store::MemoryStore;

    fn seeded() -> (SnapQuiz, u64) {
        let store = Arc::new(MemoryStore::new());
        let mut set = QuestionSet::new("Pasted Image");
        let mut q = Question::multiple_choice("What is 2+2?", vec!["3".into(), "4".into()]);
        q.answer = "B".into();
        set.add_question(q);
        let id = store.save(set);

        // Provider is never called by the export/history paths; a name-based
        // resolution with a dummy key keeps these tests offline.
        std::env::set_var("OPENAI_API_KEY", "test-key");
        let app = SnapQuiz::new(
            ExtractionConfig::builder()
                .provider_name("openai")
                .build()
                .unwrap(),
            store,
        )
        .unwrap();
        (app, id)
    }

    #[test]
    fn unknown_set_is_not_found() {
        let (app, _) = seeded();
        let err = app.question_set(999).unwrap_err();
        assert!(matches!(err, SnapQuizError::NotFound { id: 999 }));
        assert!(err.is_client_error());
    }

    #[test]
    fn pdf_export_names_the_attachment() {
        let (app, id) = seeded();
        let export = app.export_pdf(id).unwrap();
        assert_eq!(export.filename, format!("mcq-results-{id}.pdf"));
        assert_eq!(export.content_type, PDF_CONTENT_TYPE);
        assert!(export.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn word_export_names_the_attachment() {
        let (app, id) = seeded();
        let export = app.export_word(id).unwrap();
        assert_eq!(export.filename, format!("mcq-results-{id}.docx"));
        assert_eq!(export.content_type, DOCX_CONTENT_TYPE);
        assert!(export.bytes.starts_with(b"PK"));
    }

    #[test]
    fn export_of_missing_set_is_not_found() {
        let (app, _) = seeded();
        assert!(matches!(
            app.export_pdf(42_000),
            Err(SnapQuizError::NotFound { .. })
        ));
    }

    #[test]
    fn history_and_delete_round_trip() {
        let (app, id) = seeded();
        assert_eq!(app.history().len(), 1);
        assert!(app.delete_question_set(id));
        assert!(app.history().is_empty());
        assert!(!app.delete_question_set(id));
    }
}
