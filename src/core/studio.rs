use crate::core::json_extract::{extract_json, extract_json_value};
use crate::core::prompts;
use crate::domain::model::{GenerateRequest, GenerateResponse, Quality};
use crate::domain::ports::{LlmClient, SceneRenderer};
use crate::utils::error::{Result, StudioError};
use crate::utils::monitor::ProcessMonitor;
use std::sync::Arc;
use std::time::Instant;

/// Runs the idea-to-video pipeline against an LLM and a renderer.
///
/// The LLM is optional: without one the studio still starts, and every
/// operation that needs it fails with [`StudioError::LlmNotConfigured`].
pub struct Studio {
    llm: Option<Arc<dyn LlmClient>>,
    renderer: Arc<dyn SceneRenderer>,
    monitor: ProcessMonitor,
}

impl Studio {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, renderer: Arc<dyn SceneRenderer>) -> Self {
        Self {
            llm,
            renderer,
            monitor: ProcessMonitor::default(),
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = ProcessMonitor::new(enabled);
        self
    }

    pub fn is_llm_configured(&self) -> bool {
        self.llm.is_some()
    }

    fn llm(&self) -> Result<&dyn LlmClient> {
        self.llm.as_deref().ok_or(StudioError::LlmNotConfigured)
    }

    pub async fn enhance_prompt(&self, user_prompt: &str) -> Result<String> {
        tracing::info!("Step 1: Enhancing prompt...");
        self.llm()?.generate_content(&prompts::enhance(user_prompt)).await
    }

    /// Returns the theme as the JSON text the model produced.
    pub async fn design_theme(&self, description: &str) -> Result<String> {
        tracing::info!("Step 2: Designing theme...");
        let text = self.llm()?.generate_content(&prompts::design(description)).await?;
        Ok(extract_json(&text)?.to_string())
    }

    pub async fn generate_title_and_description(&self, description: &str) -> Result<serde_json::Value> {
        tracing::info!("Step 2.5: Generating title...");
        let text = self.llm()?.generate_content(&prompts::title(description)).await?;
        extract_json_value(&text)
    }

    pub async fn generate_manim_code(
        &self,
        description: &str,
        theme: &str,
        aspect_ratio: &str,
    ) -> Result<String> {
        tracing::info!("Step 3: Generating Manim code...");
        let text = self
            .llm()?
            .generate_content(&prompts::manim_code(description, theme, aspect_ratio))
            .await?;
        Ok(strip_code_fences(&text))
    }

    pub async fn render_video(&self, code: &str, quality: Quality) -> Result<String> {
        tracing::info!("Step 4: Rendering video with quality '{}'...", quality);
        self.monitor.log_stats("Render started");
        let rendered = self.renderer.render(code, quality).await?;
        self.monitor.log_stats("Render finished");
        tracing::info!("Manim render successful: {}", rendered.file_path.display());
        Ok(rendered.public_path)
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        // Fail before any model call when the request itself is unusable.
        if request.prompt.trim().is_empty() {
            return Err(StudioError::BadRequest {
                message: "Prompt is required.".to_string(),
            });
        }
        self.llm()?;

        let started = Instant::now();
        let description = self.enhance_prompt(&request.prompt).await?;
        let theme = self.design_theme(&description).await?;
        let meta = self.generate_title_and_description(&description).await?;
        let code = self
            .generate_manim_code(&description, &theme, request.aspect_ratio())
            .await?;
        let video_path = self.render_video(&code, request.quality()).await?;

        tracing::info!(
            "✅ Generation finished in {:?} ({})",
            started.elapsed(),
            video_path
        );

        Ok(GenerateResponse {
            video_path,
            code,
            meta,
        })
    }

    pub async fn suggest_prompts(&self) -> Result<serde_json::Value> {
        let text = self.llm()?.generate_content(prompts::PROMPT_SUGGESTER).await?;
        extract_json_value(&text)
    }

    pub async fn explain_code(&self, code: &str) -> Result<String> {
        self.llm()?.generate_content(&prompts::explain(code)).await
    }
}

/// Drops a surrounding markdown fence (```` ```python ... ``` ````) if the
/// model added one anyway.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    // Skip the info string (e.g. "python") on the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim().to_string()
}
