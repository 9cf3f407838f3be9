// Adapters layer: concrete implementations of the domain ports.

pub mod gemini;
pub mod manim;

pub use gemini::GeminiClient;
pub use manim::ManimRenderer;
