//! Error types for the fwateery-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the fwateery library.
#[derive(Error, Debug)]
pub enum FwateeryError {
    /// Image analysis error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Invoice store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Assistant chat error.
    #[error("chat error: {0}")]
    Chat(#[from] ChatError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning an image into raw extractions.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The model produced no text at all.
    #[error("no response text generated")]
    EmptyResponse,

    /// The model text was not valid JSON.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// The model answered but found no invoice in the image.
    #[error("no invoices found in image")]
    NoInvoicesFound,

    /// The file is not an image we accept.
    #[error("unsupported file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// The image exceeds the upload limit.
    #[error("file size {size} exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// No saved model response exists for the image.
    #[error("no model response found at {}", .0.display())]
    MissingResponse(PathBuf),

    /// The collaborator call itself failed.
    #[error("analyzer failed: {0}")]
    Collaborator(String),

    /// I/O error while reading the image or response.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the invoice store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No invoice with the given id.
    #[error("invoice not found: {0}")]
    NotFound(String),

    /// An invoice with the given id already exists.
    #[error("duplicate invoice id: {0}")]
    DuplicateId(String),

    /// The store file exists but does not hold an invoice array.
    #[error("store file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to assistant chat.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The chat collaborator failed (transport or model error).
    #[error("assistant failed: {0}")]
    Collaborator(String),
}

/// Result type for the fwateery library.
pub type Result<T> = std::result::Result<T, FwateeryError>;
