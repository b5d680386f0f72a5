//! HTTP routes and shared application state.

use std::sync::Arc;

use axum::{routing::get, routing::post, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::chat;
use super::types::HealthResponse;
use crate::agent::{PlanSynthesizer, ResearchAgent};
use crate::config::Config;
use crate::error::PlannerResult;
use crate::llm::{LlmClient, OpenAiClient};
use crate::planner::TravelPlanner;
use crate::session::SessionStore;
use crate::tools::web::DEFAULT_DDG_URL;
use crate::tools::{
    DuckDuckGoSearcher, SearchProvider, SerpApiClient, ToolRegistry, WebSearcher,
};

/// State shared by all handlers.
pub struct AppState {
    pub config: Config,
    pub planner: TravelPlanner,
}

impl AppState {
    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: Config) -> PlannerResult<Self> {
        let timeout = config.limits.http_timeout;
        let llm = Arc::new(OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.temperature,
            timeout,
        )?);
        let search = Arc::new(SerpApiClient::new(
            config.serpapi_api_key.clone(),
            config.serpapi_base_url.clone(),
            timeout,
        )?);
        let web = Arc::new(DuckDuckGoSearcher::new(DEFAULT_DDG_URL.to_string(), timeout)?);

        Ok(Self::with_collaborators(config, llm, search, web))
    }

    /// Build state around explicit collaborators.
    pub fn with_collaborators(
        config: Config,
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn SearchProvider>,
        web: Arc<dyn WebSearcher>,
    ) -> Self {
        let limits = &config.limits;
        let agent = ResearchAgent::new(
            llm.clone(),
            ToolRegistry::new(search, web),
            config.model.clone(),
            limits.max_iterations,
            limits.step_timeout,
        );
        let synthesizer = PlanSynthesizer::new(llm, config.model.clone(), limits.synthesis_timeout);
        let planner = TravelPlanner::new(
            agent,
            synthesizer,
            SessionStore::default().with_max_exchanges(limits.max_session_exchanges),
            limits.request_timeout,
        );

        Self { config, planner }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let index = state.config.static_dir.join("index.html");

    Router::new()
        .route_service("/", ServeFile::new(index))
        .route("/api/chat", post(chat::chat))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::from_config(config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
