//! Error types for the snapquiz library.
//!
//! Every stage detects its own failure and propagates it unmodified to the
//! boundary — a transport error is never downgraded into an empty result,
//! and nothing is retried internally. The taxonomy splits along the line
//! that matters to a caller serving HTTP: [`SnapQuizError::is_client_error`]
//! separates "fix your input" failures (bad upload, nothing extractable)
//! from "try again later" failures (provider down, renderer bug).

use thiserror::Error;

/// All errors returned by the snapquiz library.
#[derive(Debug, Error)]
pub enum SnapQuizError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No image bytes were supplied (empty upload or empty paste payload).
    #[error("No image data provided\nSelect an image to upload or paste a screenshot.")]
    EmptyInput,

    /// The pasted payload was not decodable base64.
    #[error("Pasted image is not valid base64: {detail}")]
    InvalidBase64 { detail: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The vision-model backend was unreachable or rejected the call.
    #[error("Extraction backend error: {detail}")]
    TransportError { detail: String },

    /// The vision call exceeded the per-request timeout.
    #[error("Extraction timed out after {secs}s\nIncrease --api-timeout or try again later.")]
    ExtractionTimeout { secs: u64 },

    /// The model responded but the parser found no usable question blocks.
    ///
    /// Distinct from [`SnapQuizError::TransportError`] on purpose: the remedy
    /// is a clearer screenshot, not a retry.
    #[error("No questions could be extracted from the image\nTry a sharper screenshot that shows the full question text.")]
    NoQuestionsExtracted,

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The PDF or Word library failed while generating a document.
    ///
    /// The underlying question set is unaffected and remains retrievable.
    #[error("Failed to render {format} document: {detail}")]
    RenderingFailed { format: &'static str, detail: String },

    // ── Lookup errors ─────────────────────────────────────────────────────
    /// No question set exists with the requested identifier.
    #[error("Question set {id} not found")]
    NotFound { id: u64 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SnapQuizError {
    /// Whether this failure is the caller's to fix (HTTP 400 class) rather
    /// than the server's (HTTP 500 class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SnapQuizError::EmptyInput
                | SnapQuizError::InvalidBase64 { .. }
                | SnapQuizError::NoQuestionsExtracted
                | SnapQuizError::NotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_client_error() {
        assert!(SnapQuizError::EmptyInput.is_client_error());
        assert!(SnapQuizError::NoQuestionsExtracted.is_client_error());
        assert!(SnapQuizError::NotFound { id: 7 }.is_client_error());
    }

    #[test]
    fn transport_is_server_error() {
        let e = SnapQuizError::TransportError {
            detail: "connection refused".into(),
        };
        assert!(!e.is_client_error());
        assert!(e.to_string().contains("connection refused"));
    }

    #[test]
    fn timeout_display() {
        let e = SnapQuizError::ExtractionTimeout { secs: 60 };
        assert!(e.to_string().contains("60s"));
        assert!(!e.is_client_error());
    }

    #[test]
    fn rendering_failed_display() {
        let e = SnapQuizError::RenderingFailed {
            format: "PDF",
            detail: "font not embedded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("PDF"));
        assert!(msg.contains("font not embedded"));
        assert!(!e.is_client_error());
    }

    #[test]
    fn not_found_display() {
        let e = SnapQuizError::NotFound { id: 42 };
        assert!(e.to_string().contains("42"));
    }
}
