//! Image submissions handed to the vision collaborator.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lazy_static::lazy_static;
use regex::Regex;

use super::Result;
use crate::error::AnalysisError;

lazy_static! {
    static ref DATA_URL_PREFIX: Regex =
        Regex::new(r"^data:image/(png|jpeg|jpg|webp);base64,").unwrap();
}

/// An invoice image ready for analysis.
#[derive(Debug, Clone)]
pub struct ImageSubmission {
    /// Where the image came from.
    pub path: PathBuf,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// `data:<mime>;base64,<payload>` encoding of the image.
    pub data_url: String,
}

impl ImageSubmission {
    /// Load an image file, enforcing the accepted types and size limit.
    pub fn from_path(path: &Path, max_bytes: u64) -> Result<Self> {
        let mime_type = mime_for(path).ok_or_else(|| AnalysisError::UnsupportedFile(path.to_path_buf()))?;

        let size = fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(AnalysisError::TooLarge { size, limit: max_bytes });
        }

        let data = fs::read(path)?;
        Ok(Self::from_bytes(path, mime_type, &data))
    }

    /// Wrap already-loaded image bytes.
    pub fn from_bytes(path: impl Into<PathBuf>, mime_type: &str, data: &[u8]) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.to_string(),
            data_url: format!("data:{};base64,{}", mime_type, STANDARD.encode(data)),
        }
    }

    /// Base64 payload without the data-URL header, the form
    /// `InvoiceAnalyzer` implementations send to a vision API.
    pub fn payload(&self) -> &str {
        strip_data_url_prefix(&self.data_url)
    }
}

/// Remove a `data:image/...;base64,` header if present. For
/// `InvoiceAnalyzer` implementations handed a stored `originalImage`.
pub fn strip_data_url_prefix(data_url: &str) -> &str {
    match DATA_URL_PREFIX.find(data_url) {
        Some(m) => &data_url[m.end()..],
        None => data_url,
    }
}

/// Whether the path has an image extension we accept.
pub fn is_supported_image(path: &Path) -> bool {
    mime_for(path).is_some()
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
