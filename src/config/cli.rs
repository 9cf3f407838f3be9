use crate::config::StudioConfig;
use crate::deploy::ImageVariant;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "manim-studio")]
#[command(about = "Turn short ideas into rendered Manim animations")]
pub struct Cli {
    #[arg(long, short, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve(ServeArgs),
    /// Run the full pipeline once and print the result as JSON
    Generate {
        prompt: String,
        #[arg(long, default_value = "landscape")]
        aspect_ratio: String,
        #[arg(long, default_value = "best")]
        quality: String,
    },
    /// Ask the model for animation ideas
    Suggest,
    /// Explain a Manim scene file
    Explain { file: PathBuf },
    /// Print a container build recipe for the service
    Dockerfile {
        #[arg(long, value_enum, default_value = "full")]
        variant: ImageVariant,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, short)]
    pub port: Option<u16>,

    #[arg(long, help = "Runtime worker threads")]
    pub workers: Option<usize>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Log process CPU/memory around renders")]
    pub monitor: bool,
}

impl Cli {
    pub fn selected_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }

    pub fn load_config(&self) -> crate::Result<StudioConfig> {
        let mut config = match &self.config {
            Some(path) => StudioConfig::from_file(path)?,
            None => StudioConfig::default(),
        };
        if self.json_logs {
            config.logging.json = true;
        }
        if let Command::Serve(args) = self.selected_command() {
            args.apply_to(&mut config);
        }
        Ok(config)
    }
}

impl ServeArgs {
    pub fn apply_to(&self, config: &mut StudioConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(workers) = self.workers {
            config.server.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            config.server.timeout_seconds = timeout;
        }
    }
}
