//! Destination research: web search over DuckDuckGo's HTML endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::validation::require_non_empty;
use super::ToolKind;
use crate::error::{PlannerError, PlannerResult};

pub const DEFAULT_DDG_URL: &str = "https://html.duckduckgo.com/html/";

const MAX_RESULTS: u32 = 10;

/// Arguments of a `web_search` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebQuery {
    pub query: String,
    #[serde(default = "default_num_results")]
    pub num_results: u32,
}

fn default_num_results() -> u32 {
    5
}

impl WebQuery {
    pub fn validate(&self) -> PlannerResult<()> {
        let tool = ToolKind::WebSearch.name();
        require_non_empty(tool, "query", &self.query)?;
        if self.num_results == 0 || self.num_results > MAX_RESULTS {
            return Err(PlannerError::tool_argument(
                tool,
                format!("field 'num_results' must be between 1 and {}", MAX_RESULTS),
            ));
        }
        Ok(())
    }
}

pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The search query, e.g. 'Tokyo local transport tips'"
            },
            "num_results": {
                "type": "integer",
                "description": "Maximum number of results to return (default: 5)"
            }
        },
        "required": ["query"]
    })
}

/// Fetches a raw results page for a query.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn results_page(&self, query: &str) -> PlannerResult<String>;
}

pub struct DuckDuckGoSearcher {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoSearcher {
    pub fn new(base_url: String, timeout: Duration) -> PlannerResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; TravelPlanner/1.0)")
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl WebSearcher for DuckDuckGoSearcher {
    async fn results_page(&self, query: &str) -> PlannerResult<String> {
        let url = format!("{}?q={}", self.base_url, urlencoding::encode(query));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PlannerError::Provider(format!("Web search failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Provider(format!("Web search HTTP error: {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| PlannerError::Provider(format!("Web search body unreadable: {}", e)))
    }
}

pub async fn search(searcher: &dyn WebSearcher, query: &WebQuery) -> PlannerResult<String> {
    let html = searcher.results_page(query.query.trim()).await?;
    let results = extract_results(&html, query.num_results as usize);

    if results.is_empty() {
        Ok(format!("No results found for: {}", query.query.trim()))
    } else {
        Ok(results.join("\n\n"))
    }
}

/// Extract up to `limit` results from a DuckDuckGo HTML page.
fn extract_results(html: &str, limit: usize) -> Vec<String> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if results.len() >= limit {
            break;
        }

        let title = inner_text_after(chunk, "class=\"result__a\"").unwrap_or("");
        let snippet = inner_text_after(chunk, "class=\"result__snippet\"").unwrap_or("No snippet");
        let url = inner_text_after(chunk, "class=\"result__url\"")
            .map(str::trim)
            .unwrap_or("");

        if !title.trim().is_empty() {
            results.push(format!(
                "**{}**\n{}\nURL: {}",
                html_decode(title.trim()),
                html_decode(snippet.trim()),
                url
            ));
        }
    }

    results
}

/// Text between the end of the tag carrying `marker` and the next `<`.
fn inner_text_after<'a>(chunk: &'a str, marker: &str) -> Option<&'a str> {
    chunk
        .split(marker)
        .nth(1)
        .and_then(|s| s.split('>').nth(1))
        .and_then(|s| s.split('<').next())
}

/// Basic HTML entity decoding.
fn html_decode(s: &str) -> String {
    // `&amp;` goes last so an escaped entity decodes only once.
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn result_html(title: &str, snippet: &str, url: &str) -> String {
        format!(
            r#"<div class="result__body"><h2><a class="result__a" href="/l">{title}</a></h2>
<a class="result__snippet" href="/l">{snippet}</a>
<a class="result__url" href="/l"> {url} </a></div>"#
        )
    }

    #[test]
    fn extracts_title_snippet_and_url() {
        let html = result_html("Tokyo &amp; Around", "Best time: spring", "www.japan-guide.com");
        let results = extract_results(&html, 5);
        assert_eq!(
            results,
            vec!["**Tokyo & Around**\nBest time: spring\nURL: www.japan-guide.com".to_string()]
        );
    }

    #[test]
    fn respects_result_limit() {
        let html: String = (0..6)
            .map(|i| result_html(&format!("Title {i}"), "s", "u"))
            .collect();
        assert_eq!(extract_results(&html, 2).len(), 2);
    }

    #[test]
    fn rejects_out_of_range_result_count() {
        let query = WebQuery {
            query: "Tokyo".to_string(),
            num_results: 50,
        };
        assert!(query.validate().is_err());
    }

    #[tokio::test]
    async fn empty_page_reports_no_results() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("q", "Kyoto temples"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let searcher =
            DuckDuckGoSearcher::new(format!("{}/html/", server.uri()), Duration::from_secs(5)).unwrap();
        let query = WebQuery {
            query: "Kyoto temples".to_string(),
            num_results: 5,
        };

        let text = search(&searcher, &query).await.unwrap();
        assert_eq!(text, "No results found for: Kyoto temples");
    }

    #[test]
    fn escaped_entities_decode_once() {
        assert_eq!(html_decode("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
        assert_eq!(html_decode("Fish &amp; Chips &lt;3"), "Fish & Chips <3");
    }
}
