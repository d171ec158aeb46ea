//! Knowledge-grounded mortgage chat.

mod domain;
pub mod model;
mod prompt;
mod service;

pub use domain::{ChatHistory, ChatMessage, ChatReply, ChatRequest, ChatRole};
pub use model::{GeminiClient, LanguageModel, ModelError};
pub use prompt::{render_prompt, ADVISOR_SYSTEM_MESSAGE};
pub use service::{
    latest_user_question, seed_history, ChatService, ChatServiceError, PreparedPrompt,
};
