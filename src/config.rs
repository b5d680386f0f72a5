//! Configuration management for the travel planner.
//!
//! Configuration can be set via environment variables (a `.env` file in the
//! working directory is loaded first, if present):
//! - `OPENAI_API_KEY` - Required. Key for the chat-completions endpoint.
//! - `SERPAPI_API_KEY` - Required. Key for flight and hotel search.
//! - `MODEL` - Optional. Model used for research and synthesis. Defaults to `gpt-4o`.
//! - `TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.7`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `5001`.
//! - `MAX_ITERATIONS` - Optional. Maximum research loop steps. Defaults to `12`.
//! - `STEP_TIMEOUT_SECS` - Optional. Deadline for a single model call. Defaults to `60`.
//! - `SYNTHESIS_TIMEOUT_SECS` - Optional. Deadline for the plan-writing model call. Defaults to `120`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Deadline for a whole `/api/chat` request. Defaults to `300`.
//! - `HTTP_TIMEOUT_SECS` - Optional. Outbound HTTP client timeout. Defaults to `60`.
//! - `SESSION_MAX_EXCHANGES` - Optional. Request/response exchanges kept per session. Defaults to `4`.
//! - `OPENAI_BASE_URL` - Optional. Defaults to `https://api.openai.com/v1`.
//! - `SERPAPI_BASE_URL` - Optional. Defaults to `https://serpapi.com/search.json`.
//! - `STATIC_DIR` - Optional. Directory holding `index.html`. Defaults to `static`.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::session::DEFAULT_MAX_EXCHANGES;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com/search.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Limits applied to the research loop and the request as a whole.
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Maximum reasoning steps before the research loop gives up
    pub max_iterations: usize,

    /// Deadline for one research model call
    pub step_timeout: Duration,

    /// Deadline for the synthesis call, which writes the whole plan
    pub synthesis_timeout: Duration,

    /// Deadline for research plus synthesis
    pub request_timeout: Duration,

    /// Timeout configured on outbound HTTP clients
    pub http_timeout: Duration,

    /// Exchanges replayed from a session
    pub max_session_exchanges: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 12,
            step_timeout: Duration::from_secs(60),
            synthesis_timeout: Duration::from_secs(120),
            request_timeout: Duration::from_secs(300),
            http_timeout: Duration::from_secs(60),
            max_session_exchanges: DEFAULT_MAX_EXCHANGES,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat-completions API key
    pub openai_api_key: String,

    /// SerpApi key
    pub serpapi_api_key: String,

    /// Model identifier
    pub model: String,

    pub temperature: f32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    pub openai_base_url: String,

    pub serpapi_base_url: String,

    /// Directory served at `/`
    pub static_dir: PathBuf,

    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if either API key is not set, and
    /// `ConfigError::InvalidValue` for unparsable numeric settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case in deployments.
        let _ = dotenvy::dotenv();

        let openai_api_key = required("OPENAI_API_KEY")?;
        let serpapi_api_key = required("SERPAPI_API_KEY")?;

        let model = std::env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = parse_or("TEMPERATURE", 0.7_f32)?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("PORT", 5001_u16)?;

        let defaults = LimitsConfig::default();
        let limits = LimitsConfig {
            max_iterations: parse_or("MAX_ITERATIONS", defaults.max_iterations)?,
            step_timeout: Duration::from_secs(parse_or(
                "STEP_TIMEOUT_SECS",
                defaults.step_timeout.as_secs(),
            )?),
            synthesis_timeout: Duration::from_secs(parse_or(
                "SYNTHESIS_TIMEOUT_SECS",
                defaults.synthesis_timeout.as_secs(),
            )?),
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )?),
            max_session_exchanges: parse_or("SESSION_MAX_EXCHANGES", defaults.max_session_exchanges)?,
        };
        for (name, value) in [
            ("MAX_ITERATIONS", limits.max_iterations),
            ("SESSION_MAX_EXCHANGES", limits.max_session_exchanges),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue(
                    name.to_string(),
                    "must be at least 1".to_string(),
                ));
            }
        }

        let openai_base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());
        let serpapi_base_url = std::env::var("SERPAPI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_SERPAPI_BASE_URL.to_string());
        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        Ok(Self {
            openai_api_key,
            serpapi_api_key,
            model,
            temperature,
            host,
            port,
            openai_base_url,
            serpapi_base_url,
            static_dir,
            limits,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(openai_api_key: String, serpapi_api_key: String) -> Self {
        Self {
            openai_api_key,
            serpapi_api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            host: "127.0.0.1".to_string(),
            port: 5001,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            serpapi_base_url: DEFAULT_SERPAPI_BASE_URL.to_string(),
            static_dir: PathBuf::from("static"),
            limits: LimitsConfig::default(),
        }
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e)))
}
