pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod deploy;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;
pub use config::StudioConfig;

pub use adapters::{GeminiClient, ManimRenderer};
pub use app::build_studio;
pub use core::studio::Studio;
pub use deploy::{ContainerRecipe, ImageVariant};
pub use server::StudioServer;
pub use utils::error::{Result, StudioError};
