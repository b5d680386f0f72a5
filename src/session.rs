//! In-memory session store (non-persistent).
//!
//! Holds the research turns of caller-identified sessions so a follow-up
//! request can build on earlier research. Requests without a session id
//! never touch the store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::llm::{ChatMessage, Role};

/// Upper bound on stored sessions; the least recently updated is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 256;

/// Exchanges kept per session. An exchange runs from a user message up to
/// the next one, so tool calls always stay with their results.
pub const DEFAULT_MAX_EXCHANGES: usize = 4;

#[derive(Debug, Clone)]
struct SessionEntry {
    messages: Vec<ChatMessage>,
    updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    max_sessions: usize,
    max_exchanges: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
            max_exchanges: DEFAULT_MAX_EXCHANGES,
        }
    }

    pub fn with_max_exchanges(mut self, max_exchanges: usize) -> Self {
        self.max_exchanges = max_exchanges.max(1);
        self
    }

    /// Stored turns for `session_id`, empty when unknown.
    pub async fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|entry| entry.messages.clone())
            .unwrap_or_default()
    }

    /// Replace the stored turns for `session_id`, keeping only the most
    /// recent exchanges.
    pub async fn save(&self, session_id: &str, mut messages: Vec<ChatMessage>) {
        let dropped = retain_recent_exchanges(&mut messages, self.max_exchanges);
        if dropped > 0 {
            tracing::debug!(%session_id, dropped, kept = messages.len(), "Trimmed session history");
        }

        let mut sessions = self.sessions.write().await;

        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.updated_at)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                tracing::debug!(session_id = %oldest, "Evicting session");
                sessions.remove(&oldest);
            }
        }

        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                messages,
                updated_at: Utc::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Drop everything before the last `max_exchanges` user messages and return
/// how many messages were removed.
fn retain_recent_exchanges(messages: &mut Vec<ChatMessage>, max_exchanges: usize) -> usize {
    let cut = messages
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, m)| m.role == Role::User)
        .nth(max_exchanges.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    messages.drain(..cut).count()
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}
