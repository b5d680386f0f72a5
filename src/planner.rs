//! Request orchestration: validate, research, synthesize.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::info;
use uuid::Uuid;

use crate::agent::{PlanSynthesizer, ResearchAgent};
use crate::error::{PlannerError, PlannerResult};
use crate::session::SessionStore;

pub const NO_MESSAGE: &str = "No message provided";

/// Drives one `/api/chat` request end to end.
pub struct TravelPlanner {
    agent: ResearchAgent,
    synthesizer: PlanSynthesizer,
    sessions: SessionStore,
    request_timeout: Duration,
}

impl TravelPlanner {
    pub fn new(
        agent: ResearchAgent,
        synthesizer: PlanSynthesizer,
        sessions: SessionStore,
        request_timeout: Duration,
    ) -> Self {
        Self {
            agent,
            synthesizer,
            sessions,
            request_timeout,
        }
    }

    /// Produce an HTML plan for `message`.
    ///
    /// Blank messages are rejected before any external call. The rest of the
    /// pipeline runs under the request deadline; when it expires the in-flight
    /// provider calls are dropped.
    pub async fn plan(&self, message: &str, session_id: Option<&str>) -> PlannerResult<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(PlannerError::ClientInput(NO_MESSAGE.to_string()));
        }

        let today = Local::now().date_naive();
        tokio::time::timeout(self.request_timeout, self.run(message, session_id, today))
            .await
            .map_err(|_| PlannerError::Timeout {
                stage: "Request",
                secs: self.request_timeout.as_secs(),
            })?
    }

    async fn run(&self, message: &str, session_id: Option<&str>, today: NaiveDate) -> PlannerResult<String> {
        let session_id = session_id.map(str::trim).filter(|id| !id.is_empty());
        let request_id = Uuid::new_v4();

        let history = match session_id {
            Some(id) => self.sessions.history(id).await,
            None => Vec::new(),
        };

        info!(%request_id, session_id = ?session_id, replayed = history.len(), "Starting research");
        let research = self.agent.research(message, today, history).await?;

        info!(
            %request_id,
            steps = research.steps,
            summary_chars = research.summary.len(),
            "Research finished, creating plan"
        );
        let plan = self.synthesizer.synthesize(&research.conversation, message).await?;

        if let Some(id) = session_id {
            self.sessions.save(id, research.conversation.into_history()).await;
        }

        info!(%request_id, chars = plan.len(), "Plan ready");
        Ok(plan)
    }
}
