//! Error taxonomy for the planning pipeline.
//!
//! Each variant maps to one failure class so the HTTP boundary can tell
//! client mistakes apart from collaborator and internal failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// The caller sent an unusable request.
    #[error("{0}")]
    ClientInput(String),

    /// A tool call carried arguments that do not match its query shape.
    /// Recovered inside the agent loop; never surfaced over HTTP.
    #[error("Invalid arguments for {tool}: {reason}")]
    ToolArgument { tool: String, reason: String },

    /// The search provider failed or returned an error payload.
    #[error("Search provider error: {0}")]
    Provider(String),

    /// The language model call failed or produced nothing usable.
    #[error("Model error: {0}")]
    Model(String),

    #[error("Max iterations ({0}) reached without completion")]
    StepLimit(usize),

    #[error("{stage} timed out after {secs}s")]
    Timeout { stage: &'static str, secs: u64 },

    #[error("{0}")]
    Internal(String),
}

impl PlannerError {
    pub fn tool_argument(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ToolArgument {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status for this failure class.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ClientInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the agent loop should feed this back to the model instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ToolArgument { .. })
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
