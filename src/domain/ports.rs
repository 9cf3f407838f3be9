use crate::domain::model::{Quality, RenderedVideo};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A text-in, text-out language model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_content(&self, prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// Turns scene source code into a video file.
#[async_trait]
pub trait SceneRenderer: Send + Sync {
    async fn render(&self, code: &str, quality: Quality) -> Result<RenderedVideo>;
}
