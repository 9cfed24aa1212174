//! Business pricing rules applied to each raw extraction.

use tracing::debug;

use super::price::normalize_price;
use crate::models::invoice::RawExtraction;

/// Fixed fee charged for a routine examination or consultation.
pub const CONSULTATION_FEE: &str = "130";

/// Lower-case substrings marking a procedure as a routine consultation.
pub const CONSULTATION_TRIGGERS: [&str; 5] = [
    "كشف",
    "examination",
    "consultation",
    "checkup",
    "check-up",
];

/// Whether a procedure description names a routine consultation.
pub fn is_consultation(procedure: &str) -> bool {
    let procedure = procedure.to_lowercase();
    let procedure = procedure.trim();
    CONSULTATION_TRIGGERS.iter().any(|t| procedure.contains(t))
}

/// Enforce the pricing rules on one extraction.
///
/// Consultations always cost [`CONSULTATION_FEE`] whatever the model read;
/// every other procedure gets [`normalize_price`]. All other fields are
/// passed through untouched.
pub fn apply_business_rules(raw: RawExtraction) -> RawExtraction {
    let consultation = raw.procedure.as_deref().is_some_and(is_consultation);

    let price = if consultation {
        debug!(procedure = ?raw.procedure, "consultation fee applied");
        CONSULTATION_FEE.to_string()
    } else {
        normalize_price(raw.price.as_deref())
    };

    RawExtraction {
        price: Some(price),
        ..raw
    }
}
