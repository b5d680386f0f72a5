//! In-process doubles for the model and search collaborators.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{PlannerError, PlannerResult};
use crate::llm::{ChatMessage, ChatResponse, LlmClient, ToolCall, ToolDefinition};
use crate::tools::{SearchProvider, WebSearcher};

/// Replays queued replies and records every request it receives.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<PlannerResult<ChatResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_text(self, content: &str) -> Self {
        self.push(Ok(ChatResponse {
            content: Some(content.to_string()),
            tool_calls: None,
            finish_reason: Some("stop".to_string()),
        }))
    }

    pub fn reply_tools(self, calls: Vec<ToolCall>) -> Self {
        self.push(Ok(ChatResponse {
            content: None,
            tool_calls: Some(calls),
            finish_reason: Some("tool_calls".to_string()),
        }))
    }

    pub fn reply_error(self, error: PlannerError) -> Self {
        self.push(Err(error))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(self, reply: PlannerResult<ChatResponse>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> PlannerResult<ChatResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: messages.to_vec(),
            tool_names: tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.function.name.clone())
                .collect(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PlannerError::Model("script exhausted".to_string())))
    }
}

/// A model that never answers; only a deadline ends the call.
pub struct PendingLlm;

#[async_trait]
impl LlmClient for PendingLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _tools: Option<&[ToolDefinition]>,
    ) -> PlannerResult<ChatResponse> {
        std::future::pending().await
    }
}

/// Returns canned payloads per engine.
pub struct FixtureSearch {
    flights: Value,
    hotels: Value,
    failure: Option<String>,
    calls: Mutex<Vec<Vec<(&'static str, String)>>>,
}

impl Default for FixtureSearch {
    fn default() -> Self {
        Self {
            flights: json!({}),
            hotels: json!({}),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FixtureSearch {
    pub fn with_flights(mut self, flights: Value) -> Self {
        self.flights = flights;
        self
    }

    pub fn with_hotels(mut self, hotels: Value) -> Self {
        self.hotels = hotels;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Vec<(&'static str, String)>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for FixtureSearch {
    async fn search(&self, params: &[(&'static str, String)]) -> PlannerResult<Value> {
        self.calls.lock().unwrap().push(params.to_vec());
        if let Some(message) = &self.failure {
            return Err(PlannerError::Provider(message.clone()));
        }
        let engine = params
            .iter()
            .find(|(k, _)| *k == "engine")
            .map(|(_, v)| v.as_str());
        match engine {
            Some("google_flights") => Ok(self.flights.clone()),
            Some("google_hotels") => Ok(self.hotels.clone()),
            other => Err(PlannerError::Provider(format!("unexpected engine: {other:?}"))),
        }
    }
}

#[derive(Default)]
pub struct FixtureWeb {
    page: String,
}

impl FixtureWeb {
    pub fn with_page(page: &str) -> Self {
        Self {
            page: page.to_string(),
        }
    }
}

#[async_trait]
impl WebSearcher for FixtureWeb {
    async fn results_page(&self, _query: &str) -> PlannerResult<String> {
        Ok(self.page.clone())
    }
}

/// Provider payload with a single nonstop option.
pub fn sample_flights() -> Value {
    json!({
        "best_flights": [{
            "price": 1180,
            "flights": [{
                "departure_airport": {"id": "BOS", "time": "2025-06-01 11:05"},
                "arrival_airport": {"id": "HND", "time": "2025-06-02 14:25"},
                "airline": "Japan Airlines",
                "flight_number": "JL 9",
                "duration": 800
            }]
        }]
    })
}

/// Provider payload with a single property.
pub fn sample_hotels() -> Value {
    json!({
        "properties": [{
            "name": "Hotel Gracery Shinjuku",
            "rate_per_night": {"lowest": "$142"},
            "total_rate": {"lowest": "$710"},
            "overall_rating": 4.2,
            "reviews": 5321
        }]
    })
}
