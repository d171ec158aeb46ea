use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::affordability::{AffordabilityEngine, MortgageInputs};
use super::chat::{ChatReply, ChatRequest, ChatService, ChatServiceError};

/// Shared handler state: the affordability engine and the chat pipeline.
pub struct AdvisorState {
    pub engine: AffordabilityEngine,
    pub chat: ChatService,
}

impl AdvisorState {
    pub fn new(engine: AffordabilityEngine, chat: ChatService) -> Self {
        Self { engine, chat }
    }
}

/// Router builder exposing the calculator, chat and knowledge endpoints.
pub fn advisor_router(state: Arc<AdvisorState>) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/chat", post(chat_handler))
        .route("/api/v1/knowledge", get(knowledge_handler))
        .with_state(state)
}

pub(crate) async fn calculate_handler(
    State(state): State<Arc<AdvisorState>>,
    Json(inputs): Json<MortgageInputs>,
) -> Response {
    if let Err(err) = inputs.validate() {
        warn!(error = %err, "rejecting calculation request");
        let payload = json!({ "error": err.to_string() });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    let result = state.engine.evaluate(&inputs);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn chat_handler(
    State(state): State<Arc<AdvisorState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match state.chat.respond(request.messages).await {
        Ok(reply) => (StatusCode::OK, Json(ChatReply { reply })).into_response(),
        Err(ChatServiceError::NoUserMessage) => {
            let payload = json!({ "error": ChatServiceError::NoUserMessage.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(ChatServiceError::Model(err)) => {
            error!(error = %err, "language model call failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn knowledge_handler(State(state): State<Arc<AdvisorState>>) -> Response {
    (StatusCode::OK, Json(state.chat.store().status())).into_response()
}
