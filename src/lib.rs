//! # Travel Planner
//!
//! An HTTP backend that turns a free-text travel request into an HTML
//! itinerary.
//!
//! This library provides:
//! - An HTTP API (`POST /api/chat`) for plan requests
//! - A tool-based research agent with flight, hotel and web search
//! - A synthesis pass that renders the research into a fixed HTML template
//!
//! ## Architecture
//!
//! Each request goes through two model stages:
//! 1. Validate the message and seed a fresh conversation
//! 2. Research: call the model with tools, execute the calls it makes, feed
//!    results back, repeat until it answers without tools or the step cap hits
//! 3. Synthesis: one tool-free call that renders the transcript as HTML
//! 4. Strip markdown fences and return the fragment
//!
//! ## Example
//!
//! ```rust,ignore
//! use travel_planner::{api, config::Config};
//!
//! let config = Config::from_env()?;
//! api::serve(config).await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod planner;
pub mod session;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{PlannerError, PlannerResult};
