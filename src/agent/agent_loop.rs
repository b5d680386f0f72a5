//! Research loop: reason, act, observe until the model stops calling tools.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{PlannerError, PlannerResult};
use crate::llm::{ChatMessage, LlmClient, ToolCall};
use crate::tools::{ToolInvocation, ToolRegistry};

use super::conversation::Conversation;
use super::prompt::{build_research_prompt, build_research_request};

/// Where the loop currently is.
#[derive(Debug)]
enum AgentState {
    /// Waiting on the model to pick the next action.
    Thinking,
    /// The model asked for these tools.
    ToolCall(Vec<ToolCall>),
    /// Tool outputs, keyed by call id, ready to append.
    Observing(Vec<(String, String)>),
    /// Final research summary.
    Done(String),
}

/// Finished research run.
#[derive(Debug, Clone)]
pub struct Research {
    pub conversation: Conversation,
    pub summary: String,
    /// Model calls made.
    pub steps: usize,
}

/// Tool-using research agent.
pub struct ResearchAgent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    model: String,
    max_iterations: usize,
    step_timeout: Duration,
}

impl ResearchAgent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        model: String,
        max_iterations: usize,
        step_timeout: Duration,
    ) -> Self {
        Self {
            llm,
            tools,
            model,
            max_iterations,
            step_timeout,
        }
    }

    /// Research a trip request.
    ///
    /// `history` holds earlier turns of the same session, if any. Tool argument
    /// problems are reported back to the model; provider and model failures
    /// abort the run.
    pub async fn research(
        &self,
        message: &str,
        today: NaiveDate,
        history: Vec<ChatMessage>,
    ) -> PlannerResult<Research> {
        let mut conversation = Conversation::seeded(
            build_research_prompt(&self.tools),
            history,
            build_research_request(message, today),
        );
        let tool_schemas = self.tools.get_tool_schemas();

        let mut steps = 0;
        let mut state = AgentState::Thinking;

        loop {
            state = match state {
                AgentState::Thinking => {
                    if steps >= self.max_iterations {
                        return Err(PlannerError::StepLimit(self.max_iterations));
                    }
                    steps += 1;
                    debug!("Research iteration {}", steps);

                    let call = self
                        .llm
                        .chat_completion(&self.model, conversation.messages(), Some(&tool_schemas));
                    let response = tokio::time::timeout(self.step_timeout, call)
                        .await
                        .map_err(|_| PlannerError::Timeout {
                            stage: "Research step",
                            secs: self.step_timeout.as_secs(),
                        })??;
                    debug!(finish_reason = ?response.finish_reason, "Model replied");

                    let requested = response.requested_tools().map(<[ToolCall]>::to_vec);
                    if let Some(tool_calls) = requested {
                        conversation.push(ChatMessage::assistant_tool_calls(
                            response.content.clone(),
                            tool_calls.clone(),
                        ));
                        AgentState::ToolCall(tool_calls)
                    } else {
                        let summary = response
                            .content
                            .filter(|c| !c.trim().is_empty())
                            .ok_or_else(|| PlannerError::Model("LLM returned empty response".to_string()))?;
                        conversation.push(ChatMessage::assistant(summary.clone()));
                        AgentState::Done(summary)
                    }
                }
                AgentState::ToolCall(tool_calls) => {
                    let mut observations = Vec::with_capacity(tool_calls.len());
                    for tool_call in &tool_calls {
                        let output = self.execute_tool_call(tool_call).await?;
                        observations.push((tool_call.id.clone(), output));
                    }
                    AgentState::Observing(observations)
                }
                AgentState::Observing(observations) => {
                    for (call_id, output) in observations {
                        conversation.push(ChatMessage::tool_result(call_id, output));
                    }
                    AgentState::Thinking
                }
                AgentState::Done(summary) => {
                    info!(steps, messages = conversation.messages().len(), "Research complete");
                    return Ok(Research {
                        conversation,
                        summary,
                        steps,
                    });
                }
            };
        }
    }

    /// Run one tool call. Argument errors become an observation; anything else propagates.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> PlannerResult<String> {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        let invocation = match ToolInvocation::parse(name, arguments) {
            Ok(invocation) => invocation,
            Err(e) if e.is_recoverable() => {
                warn!(tool = %name, error = %e, "Rejected tool call");
                return Ok(format!("Error: {}", e));
            }
            Err(e) => return Err(e),
        };

        info!(tool = %name, args = %arguments, "Calling tool");
        let output = self.tools.execute(&invocation).await?;
        debug!(tool = %name, chars = output.len(), "Tool returned");
        Ok(output)
    }
}
