//! Assistant chat sessions over an external chat model.

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::ChatError;
use crate::models::chat::{ChatMessage, ChatRole};
use crate::models::language::Language;

/// External chat collaborator. Stateless: the full prior history is sent
/// with every message.
pub trait ChatAssistant {
    /// Produce a reply to `message` given the turns before it.
    fn reply(&self, history: &[ChatMessage], message: &str, lang: Language) -> Result<String, ChatError>;
}

/// Persona instruction for `ChatAssistant` implementations to send as the
/// model's system prompt.
pub fn system_instruction(lang: Language) -> &'static str {
    match lang {
        Language::Ar => {
            "أنت مساعد طبي ذكي ومفيد. تتحدث اللغة العربية بطلاقة وتساعد المستخدمين في فهم الفواتير الطبية، المصطلحات الطبية، وتقديم نصائح عامة. جاوب دائمًا باللغة العربية."
        }
        Language::En => {
            "You are a smart and helpful medical assistant. You speak English fluently and help users understand medical invoices, medical terms, and provide general advice. Always answer in English."
        }
    }
}

/// Rolling conversation with the assistant.
#[derive(Debug, Clone)]
pub struct ChatSession {
    language: Language,
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatSession {
    /// Start a session with the assistant's welcome turn.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            messages: vec![ChatMessage::new("welcome", ChatRole::Model, language.welcome_message())],
            next_id: 0,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a user message and record the reply.
    ///
    /// Blank input is ignored and yields `Ok(None)`. On collaborator failure
    /// a localized error turn is recorded and the error returned.
    pub fn send<A: ChatAssistant>(&mut self, assistant: &A, text: &str) -> Result<Option<&ChatMessage>, ChatError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let history_len = self.messages.len();
        let user_turn = ChatMessage::new(self.new_id(), ChatRole::User, text);
        self.messages.push(user_turn);

        debug!("Sending chat message with {} prior turn(s)", history_len);
        let result = assistant.reply(&self.messages[..history_len], text, self.language);

        match result {
            Ok(reply) if reply.is_empty() => Ok(None),
            Ok(reply) => {
                let turn = ChatMessage::new(self.new_id(), ChatRole::Model, reply);
                self.messages.push(turn);
                Ok(self.messages.last())
            }
            Err(e) => {
                warn!("Chat error: {}", e);
                let turn = ChatMessage::new(self.new_id(), ChatRole::Model, self.language.chat_error_message());
                self.messages.push(turn);
                Err(e)
            }
        }
    }

    fn new_id(&mut self) -> String {
        self.next_id += 1;
        format!("{}-{}", Utc::now().timestamp_millis(), self.next_id)
    }
}
