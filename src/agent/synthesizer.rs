//! Plan synthesis: one tool-free model call that renders research as HTML.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{PlannerError, PlannerResult};
use crate::llm::{ChatMessage, LlmClient};

use super::conversation::Conversation;
use super::prompt::build_plan_prompt;

const HTML_FENCE: &str = "```html";
const FENCE: &str = "```";

pub struct PlanSynthesizer {
    llm: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
}

impl PlanSynthesizer {
    pub fn new(llm: Arc<dyn LlmClient>, model: String, timeout: Duration) -> Self {
        Self { llm, model, timeout }
    }

    /// Render the research for `request` into an HTML fragment.
    pub async fn synthesize(&self, research: &Conversation, request: &str) -> PlannerResult<String> {
        let messages = [
            ChatMessage::system(build_plan_prompt(&research.transcript())),
            ChatMessage::user(request),
        ];

        let call = self.llm.chat_completion(&self.model, &messages, None);
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| PlannerError::Timeout {
                stage: "Plan synthesis",
                secs: self.timeout.as_secs(),
            })??;

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| PlannerError::Model("Synthesis returned empty response".to_string()))?;

        Ok(strip_code_fences(&content))
    }
}

/// Remove the markdown fences models wrap around HTML.
///
/// Removal repeats until no opening token remains, since deleting one can
/// join its neighbours into a new one.
pub fn strip_code_fences(content: &str) -> String {
    let mut cleaned = content.to_string();
    while cleaned.contains(HTML_FENCE) {
        cleaned = cleaned.replace(HTML_FENCE, "");
    }

    let trimmed = cleaned.trim();
    let trimmed = trimmed.strip_suffix(FENCE).unwrap_or(trimmed);
    trimmed.trim().to_string()
}
