//! Agent module - research and plan synthesis.
//!
//! A request goes through two model stages:
//! 1. The research agent runs "tools in a loop": call the model with the
//!    flight, hotel and web search tools, execute what it asks for, feed the
//!    results back, and stop once it answers without a tool call
//! 2. The synthesizer turns the research transcript into an HTML plan with a
//!    single tool-free call

mod agent_loop;
mod conversation;
mod prompt;
mod synthesizer;

pub use agent_loop::{Research, ResearchAgent};
pub use conversation::Conversation;
pub use prompt::{build_plan_prompt, build_research_prompt, build_research_request, PLAN_SECTIONS};
pub use synthesizer::{strip_code_fences, PlanSynthesizer};
