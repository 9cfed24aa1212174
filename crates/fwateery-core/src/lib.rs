//! Core library for medical invoice capture.
//!
//! This crate provides:
//! - Invoice data models (raw model extractions and validated records)
//! - Normalization of vision model output (price repair, fixed-fee rules)
//! - Sequential batch processing over an invoice analyzer collaborator
//! - A per-user invoice store persisted as a JSON array
//! - Assistant chat sessions over a chat collaborator

pub mod analysis;
pub mod chat;
pub mod error;
pub mod models;
pub mod normalize;
pub mod store;

pub use analysis::{BatchProcessor, BatchSummary, ImageSubmission, InvoiceAnalyzer, SavedResponseAnalyzer};
pub use chat::{ChatAssistant, ChatSession};
pub use error::{AnalysisError, ChatError, FwateeryError, Result, StoreError};
pub use models::chat::{ChatMessage, ChatRole};
pub use models::config::FwateeryConfig;
pub use models::invoice::{InvoiceRecord, InvoiceStatus, InvoiceUpdate, RawExtraction};
pub use models::language::Language;
pub use normalize::{apply_business_rules, normalize_price};
pub use store::{InvoiceGroup, InvoiceStore, SortDirection, SortKey};
