//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port of the chat proxy / API server
pub const DEFAULT_PORT: u16 = 3001;

/// Default address of the external CSV analysis service
pub const DEFAULT_ANALYSIS_URL: &str = "http://localhost:5000";

/// Hosted generative-language API
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for chat answers
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Dashboard origins allowed in development (served build and Vite dev server)
pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:8080", "http://localhost:5173"];

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" => Some(Environment::Development),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Selects the CORS policy
    pub environment: Environment,
    /// Allowed origins in production
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base URL of the analysis service (serves /api/analyze-csv)
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    /// Never written back to disk when loaded from the environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Where clients reach the chat proxy
    pub proxy_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            environment: Environment::Development,
            cors_origins: vec![],
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ANALYSIS_URL.to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            proxy_url: format!("http://localhost:{}", DEFAULT_PORT),
        }
    }
}

impl ServerConfig {
    /// Origins the CORS layer accepts
    pub fn allowed_origins(&self) -> Vec<String> {
        match self.environment {
            Environment::Development => DEV_ORIGINS.iter().map(|o| o.to_string()).collect(),
            Environment::Production => self.cors_origins.clone(),
        }
    }
}

impl GeminiConfig {
    /// API key, treating blank values as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load configuration from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(env) = lookup("FEEDO_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .and_then(|e| Environment::parse(&e))
        {
            self.server.environment = env;
        }
        if let Some(origins) = lookup("FEEDO_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        // Deployed dashboard URL, added to the production list
        if let Some(frontend) = lookup("FRONTEND_URL") {
            let frontend = frontend.trim().to_string();
            if !frontend.is_empty() && !self.server.cors_origins.contains(&frontend) {
                self.server.cors_origins.push(frontend);
            }
        }
        if let Some(url) = lookup("FEEDO_ANALYSIS_URL") {
            self.analysis.base_url = url;
        }
        if let Some(url) = lookup("FEEDO_PROXY_URL") {
            self.gemini.proxy_url = url;
        }
    }

    /// Reject URLs that cannot be parsed
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("analysis.base_url", &self.analysis.base_url),
            ("gemini.base_url", &self.gemini.base_url),
            ("gemini.proxy_url", &self.gemini.proxy_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| Error::config(format!("{} is not a valid URL ({}): {}", name, value, e)))?;
        }
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::feedo_home()?.join("config.toml"))
    }

    /// Get the feedo home directory
    pub fn feedo_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("FEEDO_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "feedo", "feedo")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::config("Could not determine feedo home directory"))
    }
}
