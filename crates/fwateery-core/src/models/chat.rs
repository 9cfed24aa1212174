//! Assistant chat message model.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// A single turn in an assistant conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
