//! HTTP API.
//!
//! - `GET /` - static front page
//! - `POST /api/chat` - research a trip and return an HTML plan
//! - `GET /api/health` - liveness and version

mod chat;
pub mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
