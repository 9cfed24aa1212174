//! Analyzer backed by model responses saved next to each image.

use std::fs;

use tracing::debug;

use super::{parse_model_response, ImageSubmission, InvoiceAnalyzer, Result};
use crate::error::AnalysisError;
use crate::models::invoice::RawExtraction;
use crate::models::language::Language;

/// Reads `<image stem>.<extension>` beside the image and parses it as the
/// vision model's answer for that image.
#[derive(Debug, Clone)]
pub struct SavedResponseAnalyzer {
    extension: String,
}

impl SavedResponseAnalyzer {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }
}

impl Default for SavedResponseAnalyzer {
    fn default() -> Self {
        Self::new("json")
    }
}

impl InvoiceAnalyzer for SavedResponseAnalyzer {
    fn analyze(&self, submission: &ImageSubmission, lang: Language) -> Result<Vec<RawExtraction>> {
        let response_path = submission.path.with_extension(&self.extension);
        if !response_path.exists() {
            return Err(AnalysisError::MissingResponse(response_path));
        }

        debug!(
            "Reading {} response from {}",
            lang,
            response_path.display()
        );
        let text = fs::read_to_string(&response_path)?;
        parse_model_response(&text)
    }
}
