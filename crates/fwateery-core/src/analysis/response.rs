//! Parsing of vision model response text.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::Result;
use crate::error::AnalysisError;
use crate::models::invoice::RawExtraction;

lazy_static! {
    // Markdown code fences the model sometimes wraps JSON in
    static ref CODE_FENCE: Regex = Regex::new(r"```json\s*|```").unwrap();
}

/// Turn raw model text into extractions.
///
/// Code fences are removed; a single JSON object is treated as a list of
/// one. An empty list means the model saw no invoice.
pub fn parse_model_response(text: &str) -> Result<Vec<RawExtraction>> {
    let cleaned = CODE_FENCE.replace_all(text, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            return Err(AnalysisError::MalformedResponse(format!(
                "expected object or array, got {}",
                other
            )));
        }
    };

    if items.is_empty() {
        return Err(AnalysisError::NoInvoicesFound);
    }

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
        })
        .collect()
}
