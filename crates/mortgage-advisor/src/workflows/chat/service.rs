use std::sync::Arc;

use tracing::info;

use super::domain::{ChatMessage, ChatRole};
use super::model::{LanguageModel, ModelError};
use super::prompt::{render_prompt, ADVISOR_SYSTEM_MESSAGE};
use crate::workflows::knowledge::{retrieve, CorpusStore};

/// Composes fact retrieval, prompt rendering and the language model.
pub struct ChatService {
    store: Arc<CorpusStore>,
    model: Arc<dyn LanguageModel>,
}

/// Everything sent to the model for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPrompt {
    pub question: String,
    pub facts: String,
    pub prompt: String,
}

impl ChatService {
    pub fn new(store: Arc<CorpusStore>, model: Arc<dyn LanguageModel>) -> Self {
        Self { store, model }
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    /// Grounds the latest user message in the knowledge base.
    pub fn prepare(&self, messages: &[ChatMessage]) -> Result<PreparedPrompt, ChatServiceError> {
        let question =
            latest_user_question(messages).ok_or(ChatServiceError::NoUserMessage)?;

        let corpus = self.store.snapshot();
        let facts = retrieve(question, &corpus);
        let prompt = render_prompt(&facts, question);

        Ok(PreparedPrompt {
            question: question.to_string(),
            facts,
            prompt,
        })
    }

    /// Answers the conversation's latest user message.
    pub async fn respond(&self, messages: Vec<ChatMessage>) -> Result<String, ChatServiceError> {
        let history = seed_history(messages);
        let prepared = self.prepare(&history)?;

        info!(
            turns = history.len(),
            fact_chars = prepared.facts.len(),
            "answering mortgage question"
        );

        let reply = self.model.complete(&prepared.prompt).await?;
        Ok(reply)
    }
}

/// Places the advisor system message ahead of the caller's conversation.
pub fn seed_history(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut history = Vec::with_capacity(messages.len() + 1);
    history.push(ChatMessage::system(ADVISOR_SYSTEM_MESSAGE));
    history.extend(messages);
    history
}

pub fn latest_user_question(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|message| message.role == ChatRole::User)
        .map(|message| message.content.as_str())
}

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("conversation has no user message")]
    NoUserMessage,
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::knowledge::CorpusMode;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for RecordingModel {
        async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
            self.prompts
                .lock()
                .expect("prompt mutex poisoned")
                .push(prompt.to_string());
            Ok("Expats can borrow up to 80%.".to_string())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl LanguageModel for FailingModel {
        async fn complete(&self, _prompt: &str) -> Result<String, ModelError> {
            Err(ModelError::EmptyResponse)
        }
    }

    fn store(dir: &std::path::Path) -> Arc<CorpusStore> {
        fs::write(
            dir.join("uae_ltv_rules.txt"),
            "Expats: maximum LTV 80% on a first home.\nNationals: maximum LTV 85%.",
        )
        .expect("write kb");
        Arc::new(CorpusStore::with_default_documents(dir, CorpusMode::Reload))
    }

    #[test]
    fn latest_user_message_is_the_question() {
        let history = seed_history(vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("answer"),
            ChatMessage::user("second"),
            ChatMessage::assistant("another answer"),
        ]);

        assert_eq!(history[0], ChatMessage::system(ADVISOR_SYSTEM_MESSAGE));
        assert_eq!(latest_user_question(&history), Some("second"));
    }

    #[tokio::test]
    async fn respond_sends_grounded_prompt() {
        let dir = tempfile::tempdir().expect("temp dir");
        let model = Arc::new(RecordingModel::default());
        let service = ChatService::new(store(dir.path()), model.clone());

        let reply = service
            .respond(vec![ChatMessage::user("What LTV applies to expats?")])
            .await
            .expect("reply produced");

        assert_eq!(reply, "Expats can borrow up to 80%.");
        let prompts = model.prompts.lock().expect("prompt mutex poisoned");
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Expats: maximum LTV 80% on a first home."));
        assert!(prompts[0].contains("What LTV applies to expats?"));
    }

    #[tokio::test]
    async fn respond_rejects_conversations_without_user_turns() {
        let dir = tempfile::tempdir().expect("temp dir");
        let service = ChatService::new(store(dir.path()), Arc::new(RecordingModel::default()));

        let err = service
            .respond(vec![ChatMessage::assistant("hello")])
            .await
            .expect_err("no user message");

        assert!(matches!(err, ChatServiceError::NoUserMessage));
    }

    #[tokio::test]
    async fn model_failures_propagate() {
        let dir = tempfile::tempdir().expect("temp dir");
        let service = ChatService::new(store(dir.path()), Arc::new(FailingModel));

        let err = service
            .respond(vec![ChatMessage::user("ltv")])
            .await
            .expect_err("model fails");

        assert!(matches!(err, ChatServiceError::Model(ModelError::EmptyResponse)));
    }
}
