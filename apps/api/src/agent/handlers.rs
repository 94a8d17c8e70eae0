use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::ChatTurn;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub person_name: String,
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub tools_used: Vec<String>,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }

    let bundle = state.store.load(&req.person_name).await?.ok_or_else(|| {
        AppError::NotFound(format!("No stored profile for '{}'", req.person_name))
    })?;

    let reply = state
        .agent
        .run(&bundle, message, &req.history)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(ChatResponse {
        response: reply.answer,
        tools_used: reply.tools_used,
    }))
}
