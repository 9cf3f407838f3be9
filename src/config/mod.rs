#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{Cli, Command, ServeArgs};
pub use toml_config::{GeminiConfig, LoggingConfig, RenderConfig, ServerConfig, StudioConfig};
