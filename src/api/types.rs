//! API request and response types.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// Free-text travel request
    #[serde(default)]
    pub message: Option<String>,

    /// Optional caller-chosen key for continuing earlier research
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Successful plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// HTML fragment
    pub response: String,
}

/// Error body for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
