use crate::utils::error::{Result, StudioError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub timeout_seconds: u64,
    pub templates_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: 2,
            timeout_seconds: 300,
            templates_dir: "templates".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_seconds: 120,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub command: String,
    pub static_dir: String,
    pub scenes_dir: String,
    /// Defaults to `server.workers` when unset.
    pub max_concurrent: Option<usize>,
    pub keep_sources: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: "manim".to_string(),
            static_dir: "static".to_string(),
            scenes_dir: "scenes".to_string(),
            max_concurrent: None,
            keep_sources: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl StudioConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| StudioError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StudioError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// The configured key, else `GOOGLE_API_KEY`. Blank values and
    /// placeholders left unresolved by substitution count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key_or(|| std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_or<F>(&self, from_env: F) -> Option<String>
    where
        F: FnOnce() -> Option<String>,
    {
        let usable = |key: &String| {
            let key = key.trim();
            !key.is_empty() && !(key.starts_with("${") && key.ends_with('}'))
        };

        self.gemini
            .api_key
            .clone()
            .filter(usable)
            .or_else(|| from_env().filter(usable))
    }

    pub fn max_concurrent_renders(&self) -> usize {
        self.render.max_concurrent.unwrap_or(self.server.workers).max(1)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.workers", self.server.workers, 1, 256)?;
        validation::validate_range("server.timeout_seconds", self.server.timeout_seconds, 1, 86_400)?;
        validation::validate_path("server.templates_dir", &self.server.templates_dir)?;

        validation::validate_url("gemini.base_url", &self.gemini.base_url)?;
        validation::validate_non_empty_string("gemini.model", &self.gemini.model)?;
        validation::validate_positive_number(
            "gemini.timeout_seconds",
            self.gemini.timeout_seconds as usize,
            1,
        )?;
        if let Some(temperature) = self.gemini.temperature {
            validation::validate_range("gemini.temperature", temperature, 0.0, 2.0)?;
        }

        validation::validate_non_empty_string("render.command", &self.render.command)?;
        validation::validate_path("render.static_dir", &self.render.static_dir)?;
        validation::validate_path("render.scenes_dir", &self.render.scenes_dir)?;
        if let Some(max) = self.render.max_concurrent {
            validation::validate_positive_number("render.max_concurrent", max, 1)?;
        }

        validation::validate_log_level("logging.level", &self.logging.level)?;
        Ok(())
    }
}

impl Validate for StudioConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Replaces `${VAR}` with the environment value. Unset variables are left
/// as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| StudioError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
