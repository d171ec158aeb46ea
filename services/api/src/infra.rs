use metrics_exporter_prometheus::PrometheusHandle;
use mortgage_advisor::config::{KnowledgeConfig, ModelConfig};
use mortgage_advisor::error::AppError;
use mortgage_advisor::workflows::chat::{GeminiClient, LanguageModel};
use mortgage_advisor::workflows::knowledge::CorpusStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn corpus_store(config: &KnowledgeConfig) -> Arc<CorpusStore> {
    let store = CorpusStore::new(
        config.directory.clone(),
        config.documents.clone(),
        config.mode,
    );

    let corpus = store.snapshot();
    if corpus.documents().len() < config.documents.len() {
        warn!(
            directory = %config.directory.display(),
            loaded = corpus.documents().len(),
            configured = config.documents.len(),
            "knowledge base is incomplete"
        );
    } else {
        info!(
            directory = %config.directory.display(),
            mode = config.mode.label(),
            "knowledge base ready"
        );
    }

    Arc::new(store)
}

pub(crate) fn language_model(config: &ModelConfig) -> Result<Arc<dyn LanguageModel>, AppError> {
    if config.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; /chat requests will fail until it is configured");
    }

    let model: Arc<dyn LanguageModel> = Arc::new(GeminiClient::new(config.clone())?);
    Ok(model)
}
