pub mod json_extract;
pub mod prompts;
pub mod studio;

pub use crate::domain::model::{GenerateRequest, GenerateResponse, Quality, RenderedVideo};
pub use crate::domain::ports::{LlmClient, SceneRenderer};
pub use crate::utils::error::Result;
