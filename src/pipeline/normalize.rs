//! Image normalisation: canonicalise an upload or pasted base64 payload.
//!
//! Browsers hand us screenshots two ways: a multipart file upload (raw
//! bytes plus a filename) or a clipboard paste (a base64 string, usually
//! wrapped in a `data:image/png;base64,…` URL). Both collapse here into a
//! [`NormalizedImage`] — one byte buffer and one declared media type —
//! before anything touches the network. Deliberately no format sniffing:
//! the vision backend decodes the image itself and reports its own error,
//! so validating magic bytes here would only duplicate (and possibly
//! contradict) that check.

use crate::error::SnapQuizError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use tracing::debug;

/// A screenshot as it arrives from the caller.
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// Binary file upload with an optional original filename.
    Upload {
        filename: Option<String>,
        bytes: Vec<u8>,
    },
    /// Pasted base64 string, optionally prefixed with a data-URL header
    /// (`data:image/png;base64,…`).
    Base64(String),
}

/// The canonical image buffer handed to the extraction backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    /// Decoded image bytes.
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. `image/png`. Taken from the data-URL
    /// header or the upload filename; defaults to `image/png`.
    pub media_type: String,
}

impl NormalizedImage {
    /// Re-encode as a base64 attachment for the multimodal API request body.
    pub fn to_image_data(&self) -> ImageData {
        let b64 = STANDARD.encode(&self.bytes);
        debug!("Encoded image → {} bytes base64", b64.len());
        ImageData::new(b64, &self.media_type).with_detail("high")
    }
}

/// Canonicalise caller input into bytes + media type.
///
/// Fails with [`SnapQuizError::EmptyInput`] when no usable bytes remain and
/// [`SnapQuizError::InvalidBase64`] when a pasted payload does not decode.
pub fn normalize(input: ImageInput) -> Result<NormalizedImage, SnapQuizError> {
    match input {
        ImageInput::Upload { filename, bytes } => {
            if bytes.is_empty() {
                return Err(SnapQuizError::EmptyInput);
            }
            let media_type = media_type_from_filename(filename.as_deref());
            debug!(
                "Normalized upload: {} bytes, {}",
                bytes.len(),
                media_type
            );
            Ok(NormalizedImage { bytes, media_type })
        }
        ImageInput::Base64(raw) => {
            if raw.trim().is_empty() {
                return Err(SnapQuizError::EmptyInput);
            }
            let (payload, media_type) = split_data_url(&raw);
            let bytes = STANDARD
                .decode(payload.trim())
                .map_err(|e| SnapQuizError::InvalidBase64 {
                    detail: e.to_string(),
                })?;
            if bytes.is_empty() {
                return Err(SnapQuizError::EmptyInput);
            }
            debug!("Normalized paste: {} bytes, {}", bytes.len(), media_type);
            Ok(NormalizedImage { bytes, media_type })
        }
    }
}

/// Strip a `data:image…,` prefix, returning the payload and the declared
/// media type (default `image/png` when no header is present).
fn split_data_url(raw: &str) -> (&str, String) {
    if let Some(rest) = raw.strip_prefix("data:image") {
        if let Some(comma) = rest.find(',') {
            let header = &rest[..comma];
            // header looks like "/png;base64"
            let subtype = header
                .strip_prefix('/')
                .map(|h| h.split(';').next().unwrap_or("png"))
                .unwrap_or("png");
            return (&rest[comma + 1..], format!("image/{subtype}"));
        }
    }
    (raw, "image/png".to_string())
}

/// Guess the media type from the upload's filename extension.
fn media_type_from_filename(filename: Option<&str>) -> String {
    let ext = filename
        .and_then(|f| f.rsplit('.').next())
        .map(|e| e.to_ascii_lowercase());
    let subtype = match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "jpeg",
        Some("gif") => "gif",
        Some("webp") => "webp",
        Some("bmp") => "bmp",
        _ => "png",
    };
    format!("image/{subtype}")
}
