//! Image analysis: the vision collaborator seam and the batch driver around it.

mod batch;
mod response;
mod saved;
mod submission;

pub use batch::{BatchFailure, BatchProcessor, BatchSummary};
pub use response::parse_model_response;
pub use saved::SavedResponseAnalyzer;
pub use submission::{is_supported_image, strip_data_url_prefix, ImageSubmission};

use crate::error::AnalysisError;
use crate::models::invoice::RawExtraction;
use crate::models::language::Language;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// External vision collaborator: finds every invoice in one image.
///
/// Implementations return the model's fields as-is; normalization happens
/// afterwards in [`BatchProcessor`].
pub trait InvoiceAnalyzer {
    /// Extract zero or more invoices from the submitted image, with text
    /// fields in the given language.
    fn analyze(&self, submission: &ImageSubmission, lang: Language) -> Result<Vec<RawExtraction>>;
}
