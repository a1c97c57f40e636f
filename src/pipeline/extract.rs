//! Extraction client: one vision call to the multimodal model.
//!
//! This module converts a normalised screenshot into a VLM API call and
//! returns the model's raw text. It is intentionally thin — all prompt
//! engineering lives in [`crate::prompts`], and everything downstream of
//! the raw text lives in [`crate::pipeline::parse`].
//!
//! ## No retries
//!
//! The call is wrapped in a hard timeout and is never retried here. A
//! stalled provider surfaces as [`SnapQuizError::ExtractionTimeout`] and a
//! rejected call as [`SnapQuizError::TransportError`]; callers that want a
//! retry policy layer it on top, where they can also budget for it.

use crate::config::ExtractionConfig;
use crate::error::SnapQuizError;
use crate::pipeline::normalize::NormalizedImage;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

/// Send the screenshot to the vision model and return its raw text output.
///
/// ## Message Layout
///
/// 1. **System message** — the extraction instruction prompt (or the
///    caller's override)
/// 2. **User message** — the screenshot as a base64 image attachment with
///    empty text: VLM APIs require at least one user turn to respond to,
///    and the image carries all the actual content.
pub async fn extract_text(
    provider: &Arc<dyn LLMProvider>,
    image: &NormalizedImage,
    config: &ExtractionConfig,
) -> Result<String, SnapQuizError> {
    let start = Instant::now();
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user_with_images("", vec![image.to_image_data()]),
    ];

    let options = build_options(config);
    let budget = Duration::from_secs(config.api_timeout_secs);

    let response = match timeout(budget, provider.chat(&messages, Some(&options))).await {
        Err(_elapsed) => {
            warn!(
                "Vision call exceeded {}s timeout",
                config.api_timeout_secs
            );
            return Err(SnapQuizError::ExtractionTimeout {
                secs: config.api_timeout_secs,
            });
        }
        Ok(Err(e)) => {
            warn!("Vision call failed: {e}");
            return Err(SnapQuizError::TransportError {
                detail: e.to_string(),
            });
        }
        Ok(Ok(response)) => response,
    };

    debug!(
        "Vision call: {} input tokens, {} output tokens, {:?}",
        response.prompt_tokens,
        response.completion_tokens,
        start.elapsed()
    );

    Ok(response.content)
}

/// Build `CompletionOptions` from the extraction config.
fn build_options(config: &ExtractionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = ExtractionConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.1));
        assert_eq!(opts.max_tokens, Some(4096));
    }
}
