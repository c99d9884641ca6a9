use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::PathBuf;

/// Placeholder written by the original `.env` template; treated as "no key".
const WEATHER_KEY_PLACEHOLDER: &str = "your_weather_api_key_here";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub agent: AgentConfig,
    pub model: ModelConfig,
    pub weather: WeatherConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum THINKING -> ACTING cycles per turn.
    pub max_iterations: usize,
    /// Number of most recent turns replayed into the prompt.
    pub memory_window: usize,
    /// Number of turns retained per session before the oldest is evicted.
    pub memory_capacity: usize,
    /// Caller-side timeout for one model call.
    pub llm_timeout_secs: u64,
    /// Optional file overriding the built-in prompt template.
    pub prompt_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    /// `ollama`, `openai` or `anthropic`.
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub json_logs: bool,
    pub metrics: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("SHOPDESK_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__SERVER__PORT=3000 to server.port
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut cfg: Self = s.try_deserialize()?;
        cfg.apply_legacy_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Honour the plain variables used by the original `.env` file.
    pub fn apply_legacy_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.weather.api_key.is_none() {
            if let Some(key) = lookup("WEATHER_API_KEY") {
                self.weather.api_key = Some(Secret::new(key));
            }
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            if self.model.provider == "ollama" && !model.trim().is_empty() {
                self.model.model = model;
            }
        }
    }
}

impl WeatherConfig {
    /// The configured provider key, ignoring blanks and the template placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().trim())
            .filter(|k| !k.is_empty() && *k != WEATHER_KEY_PLACEHOLDER)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8501,
            enable_cors: true,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            memory_window: 10,
            memory_capacity: 200,
            llm_timeout_secs: 60,
            prompt_path: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".into(),
            model: "llama3.1".into(),
            base_url: "http://localhost:11434".into(),
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 1024,
            request_timeout_secs: 60,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "http://api.openweathermap.org/data/2.5/weather".into(),
            timeout_secs: 5,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            metrics: true,
        }
    }
}
