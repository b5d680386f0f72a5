//! Conversation state threaded through one research run.

use crate::llm::{ChatMessage, Role};

/// Ordered, role-tagged messages for a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Start a conversation: system instruction, replayed turns, then the new request.
    pub fn seeded(system: String, history: Vec<ChatMessage>, user: String) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend(history.into_iter().filter(|m| m.role != Role::System));
        messages.push(ChatMessage::user(user));
        Self { messages }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Turns worth replaying on a later request in the same session.
    pub fn into_history(self) -> Vec<ChatMessage> {
        self.messages
            .into_iter()
            .filter(|m| m.role != Role::System)
            .collect()
    }

    /// Plain-text rendering of the research, embedded in the synthesis prompt.
    ///
    /// The system instruction is omitted; it carries no research.
    pub fn transcript(&self) -> String {
        let mut out = Vec::new();
        for message in &self.messages {
            match message.role {
                Role::System => {}
                Role::User => out.push(format!("[user]\n{}", content_of(message))),
                Role::Assistant => {
                    if let Some(content) = message.content.as_deref().filter(|c| !c.trim().is_empty()) {
                        out.push(format!("[assistant]\n{}", content));
                    }
                    for call in message.tool_calls.iter().flatten() {
                        out.push(format!(
                            "[assistant called {}]\n{}",
                            call.function.name, call.function.arguments
                        ));
                    }
                }
                Role::Tool => out.push(format!(
                    "[tool result {}]\n{}",
                    message.tool_call_id.as_deref().unwrap_or("?"),
                    content_of(message)
                )),
            }
        }
        out.join("\n\n")
    }
}

fn content_of(message: &ChatMessage) -> &str {
    message.content.as_deref().unwrap_or("")
}
