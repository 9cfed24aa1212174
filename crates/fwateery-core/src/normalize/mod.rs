//! Normalization of raw vision model output into business-compliant values.

pub mod price;
pub mod rules;

pub use price::{normalize_price, PRICE_CEILING};
pub use rules::{apply_business_rules, is_consultation, CONSULTATION_FEE, CONSULTATION_TRIGGERS};
