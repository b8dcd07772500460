//! HTTP handlers for the conversation API.
//!
//! These handlers connect Axum routes to the flow controller and the
//! blueprint catalog.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::flow::{FlowController, FlowError, TurnRequest};
use crate::domain::foundation::ErrorCode;
use crate::ports::BlueprintStore;

use super::dto::{BlueprintSummary, ErrorBody, MessageRequest, MessageResponse};

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<FlowController>,
    pub blueprints: Arc<dyn BlueprintStore>,
}

/// POST /api/conversations/messages - Run one conversation turn.
pub async fn post_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let turn = TurnRequest {
        conversation_id: request.conversation_id,
        text: request.text,
    };
    let response = state.controller.handle_message(turn).await?;
    Ok(Json(MessageResponse::from(response)))
}

/// GET /api/blueprints - List available service blueprints.
pub async fn list_blueprints(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let blueprints = state.blueprints.list().await?;
    let summaries: Vec<BlueprintSummary> =
        blueprints.iter().map(BlueprintSummary::from).collect();
    Ok(Json(summaries))
}

/// API error type that converts flow errors to HTTP responses.
pub struct ApiError(FlowError);

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        Self(err)
    }
}

impl From<crate::ports::StoreError> for ApiError {
    fn from(err: crate::ports::StoreError) -> Self {
        Self(FlowError::Store(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let code = self.0.code();
        let status = match code {
            ErrorCode::ConversationNotFound
            | ErrorCode::BlueprintNotFound
            | ErrorCode::FieldNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InvalidStateTransition | ErrorCode::ConversationCompleted => {
                StatusCode::CONFLICT
            }
            ErrorCode::PluginConfigNotFound
            | ErrorCode::PluginNotRegistered
            | ErrorCode::PluginExecutionFailed
            | ErrorCode::StorageError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            code: code.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
