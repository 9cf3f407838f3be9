use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Gemini API not configured.")]
    LlmNotConfigured,

    #[error("LLM request failed: {message}")]
    LlmError { message: String },

    #[error("{message}")]
    JsonExtractionError { message: String },

    #[error("{message}")]
    RenderError { message: String },

    #[error("Could not locate the rendered video file.")]
    VideoNotFound { search_dir: String },

    #[error("{message}")]
    BadRequest { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Llm,
    Render,
    Io,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StudioError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StudioError::ApiError(_) => ErrorCategory::Network,
            StudioError::IoError(_) => ErrorCategory::Io,
            StudioError::SerializationError(_) | StudioError::JsonExtractionError { .. } => {
                ErrorCategory::Llm
            }
            StudioError::ConfigError { .. }
            | StudioError::ConfigValidationError { .. }
            | StudioError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            StudioError::LlmNotConfigured | StudioError::LlmError { .. } => ErrorCategory::Llm,
            StudioError::RenderError { .. } | StudioError::VideoNotFound { .. } => {
                ErrorCategory::Render
            }
            StudioError::BadRequest { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StudioError::BadRequest { .. } => ErrorSeverity::Low,
            StudioError::ApiError(_)
            | StudioError::LlmError { .. }
            | StudioError::JsonExtractionError { .. }
            | StudioError::SerializationError(_) => ErrorSeverity::Medium,
            StudioError::RenderError { .. }
            | StudioError::VideoNotFound { .. }
            | StudioError::LlmNotConfigured => ErrorSeverity::High,
            StudioError::IoError(_)
            | StudioError::ConfigError { .. }
            | StudioError::ConfigValidationError { .. }
            | StudioError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        if let StudioError::LlmNotConfigured = self {
            return "No Gemini API key is configured.".to_string();
        }
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => "Could not reach the language model service.".to_string(),
            ErrorCategory::Llm => format!("The language model returned an unusable answer: {}", self),
            ErrorCategory::Render => format!("Rendering the animation failed: {}", self),
            ErrorCategory::Io => format!("File system error: {}", self),
            ErrorCategory::Input => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StudioError::LlmNotConfigured => "Set GOOGLE_API_KEY or gemini.api_key in the config file",
            StudioError::ApiError(_) => "Check network connectivity and the gemini.base_url setting",
            StudioError::LlmError { .. }
            | StudioError::JsonExtractionError { .. }
            | StudioError::SerializationError(_) => "Retry the request; model output varies between calls",
            StudioError::RenderError { .. } => "Check that manim is installed and inspect the logged stderr",
            StudioError::VideoNotFound { .. } => "Verify render.static_dir matches the manim media directory",
            StudioError::IoError(_) => "Check permissions on the static and scenes directories",
            StudioError::ConfigError { .. }
            | StudioError::ConfigValidationError { .. }
            | StudioError::InvalidConfigValueError { .. } => "Fix the configuration file or CLI flags",
            StudioError::BadRequest { .. } => "Correct the request body",
        }
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
