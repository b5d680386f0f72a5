//! Research tools available to the agent.
//!
//! The set is closed: each capability is a [`ToolKind`] and every call is
//! parsed into a typed [`ToolInvocation`] before anything runs, so a bad
//! payload never reaches a provider.

pub mod flights;
pub mod hotels;
mod serpapi;
mod validation;
pub mod web;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PlannerError, PlannerResult};
use crate::llm::ToolDefinition;

pub use flights::FlightQuery;
pub use hotels::HotelQuery;
pub use serpapi::{SearchProvider, SerpApiClient};
pub use web::{DuckDuckGoSearcher, WebQuery, WebSearcher};

/// Named research capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    FlightSearch,
    HotelSearch,
    WebSearch,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [Self::FlightSearch, Self::HotelSearch, Self::WebSearch];

    pub fn name(self) -> &'static str {
        match self {
            Self::FlightSearch => "flight_search",
            Self::HotelSearch => "hotel_search",
            Self::WebSearch => "web_search",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FlightSearch => {
                "Search for flights between airports. Takes departure_id, arrival_id, \
                 outbound_date, and optional return_date (YYYY-MM-DD) and currency."
            }
            Self::HotelSearch => {
                "Search for hotels in a specific location. Takes location, check_in_date, \
                 check_out_date (YYYY-MM-DD), and optional adults and currency."
            }
            Self::WebSearch => {
                "Search the web for destination information: attractions, local transport, \
                 food, customs and the best time to visit."
            }
        }
    }

    pub fn parameters_schema(self) -> Value {
        match self {
            Self::FlightSearch => flights::parameters_schema(),
            Self::HotelSearch => hotels::parameters_schema(),
            Self::WebSearch => web::parameters_schema(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition::function(self.name(), self.description(), self.parameters_schema())
    }
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    FlightSearch(FlightQuery),
    HotelSearch(HotelQuery),
    WebSearch(WebQuery),
}

impl ToolInvocation {
    /// Parse and validate the raw `(name, arguments)` pair emitted by the model.
    ///
    /// Every failure is a [`PlannerError::ToolArgument`], which the agent loop
    /// reports back to the model instead of aborting the request.
    pub fn parse(name: &str, arguments: &str) -> PlannerResult<Self> {
        let kind = ToolKind::from_name(name).ok_or_else(|| {
            let known: Vec<&str> = ToolKind::ALL.iter().map(|k| k.name()).collect();
            PlannerError::tool_argument(
                name,
                format!("unknown tool; available tools: {}", known.join(", ")),
            )
        })?;

        let invocation = match kind {
            ToolKind::FlightSearch => Self::FlightSearch(decode(kind, arguments)?),
            ToolKind::HotelSearch => Self::HotelSearch(decode(kind, arguments)?),
            ToolKind::WebSearch => Self::WebSearch(decode(kind, arguments)?),
        };
        invocation.validate()?;
        Ok(invocation)
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::FlightSearch(_) => ToolKind::FlightSearch,
            Self::HotelSearch(_) => ToolKind::HotelSearch,
            Self::WebSearch(_) => ToolKind::WebSearch,
        }
    }

    fn validate(&self) -> PlannerResult<()> {
        match self {
            Self::FlightSearch(query) => query.validate(),
            Self::HotelSearch(query) => query.validate(),
            Self::WebSearch(query) => query.validate(),
        }
    }
}

fn decode<T: DeserializeOwned>(kind: ToolKind, arguments: &str) -> PlannerResult<T> {
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(arguments).map_err(|e| PlannerError::tool_argument(kind.name(), e.to_string()))
}

/// Executes validated invocations against the configured collaborators.
#[derive(Clone)]
pub struct ToolRegistry {
    search: Arc<dyn SearchProvider>,
    web: Arc<dyn WebSearcher>,
}

impl ToolRegistry {
    pub fn new(search: Arc<dyn SearchProvider>, web: Arc<dyn WebSearcher>) -> Self {
        Self { search, web }
    }

    /// Tool kinds in the order they are advertised.
    pub fn list_tools(&self) -> &'static [ToolKind] {
        &ToolKind::ALL
    }

    /// Schemas sent to the model with every research step.
    pub fn get_tool_schemas(&self) -> Vec<ToolDefinition> {
        self.list_tools().iter().map(|kind| kind.definition()).collect()
    }

    pub async fn execute(&self, invocation: &ToolInvocation) -> PlannerResult<String> {
        match invocation {
            ToolInvocation::FlightSearch(query) => flights::search(self.search.as_ref(), query).await,
            ToolInvocation::HotelSearch(query) => hotels::search(self.search.as_ref(), query).await,
            ToolInvocation::WebSearch(query) => web::search(self.web.as_ref(), query).await,
        }
    }
}

/// Render a provider field for display; absent or null values become `N/A`.
pub(crate) fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixtureSearch, FixtureWeb};
    use serde_json::json;

    #[test]
    fn parses_flight_call_with_defaults() {
        let invocation = ToolInvocation::parse(
            "flight_search",
            r#"{"departure_id": "BOS", "arrival_id": "HND", "outbound_date": "2025-06-01"}"#,
        )
        .unwrap();

        match invocation {
            ToolInvocation::FlightSearch(query) => {
                assert_eq!(query.currency, "USD");
                assert_eq!(query.return_date, None);
            }
            other => panic!("unexpected invocation: {other:?}"),
        }
    }

    #[test]
    fn unknown_tool_is_a_recoverable_error() {
        let err = ToolInvocation::parse("duckduckgo", "{}").unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("available tools: flight_search, hotel_search, web_search"));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = ToolInvocation::parse("hotel_search", r#"{"location": "Tokyo"}"#).unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("check_in_date"));
    }

    #[test]
    fn wrong_primitive_type_is_rejected() {
        let err = ToolInvocation::parse(
            "hotel_search",
            r#"{"location": "Tokyo", "check_in_date": "2025-06-01", "check_out_date": "2025-06-06", "adults": "two"}"#,
        )
        .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = ToolInvocation::parse("web_search", "{query: Tokyo").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn schemas_cover_every_tool() {
        let registry = ToolRegistry::new(
            Arc::new(FixtureSearch::default()),
            Arc::new(FixtureWeb::default()),
        );
        let names: Vec<String> = registry
            .get_tool_schemas()
            .into_iter()
            .map(|d| d.function.name)
            .collect();
        assert_eq!(names, vec!["flight_search", "hotel_search", "web_search"]);
    }

    #[tokio::test]
    async fn executes_hotel_search_through_provider() {
        let search = Arc::new(FixtureSearch::default().with_hotels(json!({"properties": []})));
        let registry = ToolRegistry::new(search.clone(), Arc::new(FixtureWeb::default()));

        let invocation = ToolInvocation::parse(
            "hotel_search",
            r#"{"location": "Tokyo", "check_in_date": "2025-06-01", "check_out_date": "2025-06-06", "adults": 1}"#,
        )
        .unwrap();
        let text = registry.execute(&invocation).await.unwrap();

        assert_eq!(text, hotels::NO_HOTELS);
        let calls = search.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains(&("q", "Tokyo".to_string())));
        assert!(calls[0].contains(&("adults", "1".to_string())));
    }

    #[tokio::test]
    async fn executes_web_search_against_results_page() {
        let page = r#"<div class="result__body"><a class="result__a" href="/x">Tokyo Metro Guide</a>
<a class="result__snippet" href="/x">Buy a Suica card</a><a class="result__url" href="/x">tokyometro.jp</a></div>"#;
        let registry = ToolRegistry::new(
            Arc::new(FixtureSearch::default()),
            Arc::new(FixtureWeb::with_page(page)),
        );

        let invocation =
            ToolInvocation::parse("web_search", r#"{"query": "Tokyo transport"}"#).unwrap();
        assert_eq!(invocation.kind(), ToolKind::WebSearch);

        let text = registry.execute(&invocation).await.unwrap();
        assert_eq!(text, "**Tokyo Metro Guide**\nBuy a Suica card\nURL: tokyometro.jp");
    }

    #[test]
    fn field_text_formats_scalars() {
        assert_eq!(field_text(None), "N/A");
        assert_eq!(field_text(Some(&Value::Null)), "N/A");
        assert_eq!(field_text(Some(&json!("$120"))), "$120");
        assert_eq!(field_text(Some(&json!(4.5))), "4.5");
    }
}
