//! Wiring from configuration to a ready [`Studio`].

use crate::adapters::{GeminiClient, ManimRenderer};
use crate::config::StudioConfig;
use crate::core::studio::Studio;
use crate::domain::ports::LlmClient;
use crate::utils::error::Result;
use std::sync::Arc;

/// A missing API key is not fatal: the studio starts without an LLM and its
/// model-backed operations report that they are unconfigured.
pub fn build_studio(config: &StudioConfig, monitor: bool) -> Result<Studio> {
    let llm: Option<Arc<dyn LlmClient>> = match config.resolved_api_key() {
        Some(key) => {
            let client = GeminiClient::new(&config.gemini, key)?;
            tracing::info!("✅ Gemini configured (model {})", client.model_name());
            Some(Arc::new(client))
        }
        None => {
            tracing::error!(
                "FATAL: {} environment variable not set. Generation endpoints will return 503.",
                crate::config::toml_config::API_KEY_ENV
            );
            None
        }
    };

    let renderer = ManimRenderer::new(&config.render, config.max_concurrent_renders());
    Ok(Studio::new(llm, Arc::new(renderer)).with_monitoring(monitor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_explicit_key() {
        let mut config = StudioConfig::default();
        config.gemini.api_key = Some("test-key".to_string());
        let studio = build_studio(&config, false).unwrap();
        assert!(studio.is_llm_configured());
    }
}
