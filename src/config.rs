use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for reply-desk.
///
/// Built once at startup and shared read-only with both upstream clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub base_url: String,
    pub access_token: String,
    pub page_id: String,
    pub default_post_limit: u32,
    pub default_comment_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Token budget quoted to the model inside the prompt
    pub reply_token_hint: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::warn!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("REPLY_DESK_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match Self::from_yaml(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {}. Using defaults.",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {}. Using defaults.",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::info!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(host) = lookup("REPLY_DESK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            if let Ok(port_num) = port.parse() {
                self.server.port = port_num;
            }
        }

        // Graph overrides
        if let Some(token) = lookup("FB_ACCESS_TOKEN") {
            self.graph.access_token = token;
        }
        if let Some(page_id) = lookup("PAGE_ID") {
            self.graph.page_id = page_id;
        }
        if let Some(url) = lookup("GRAPH_URL") {
            self.graph.base_url = url;
        }

        // OpenAI overrides
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.openai.api_key = api_key;
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.openai.model = model;
        }

        if let Some(timeout) = lookup("UPSTREAM_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.upstream.timeout_seconds = secs;
            }
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".into());
        }

        if self.graph.access_token.is_empty() {
            return Err("FB_ACCESS_TOKEN environment variable must be set".into());
        }
        if self.graph.page_id.is_empty() {
            return Err("PAGE_ID environment variable must be set".into());
        }
        if self.graph.default_post_limit == 0 || self.graph.default_comment_limit == 0 {
            return Err("Default post/comment limits must be positive".into());
        }

        if self.openai.api_key.is_empty() {
            return Err("OPENAI_API_KEY environment variable must be set".into());
        }
        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err("OpenAI temperature must be between 0.0 and 2.0".into());
        }

        if self.upstream.timeout_seconds == 0 {
            return Err("Upstream timeout cannot be 0".into());
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Get the upstream request timeout as Duration
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            graph: GraphConfig {
                base_url: "https://graph.facebook.com/v19.0".to_string(),
                access_token: String::new(),
                page_id: String::new(),
                default_post_limit: 5,
                default_comment_limit: 10,
            },
            openai: OpenAIConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                api_key: String::new(),
                model: "gpt-3.5-turbo".to_string(),
                max_tokens: 30,
                temperature: 0.7,
                reply_token_hint: 15,
            },
            upstream: UpstreamConfig::default(),
        }
    }
}
