use anyhow::Context;
use clap::Parser;
use manim_studio::config::Command;
use manim_studio::domain::model::GenerateRequest;
use manim_studio::utils::error::ErrorSeverity;
use manim_studio::utils::{logger, validation::Validate};
use manim_studio::{build_studio, Cli, ContainerRecipe, StudioConfig, StudioError, StudioServer};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(&e));
        }
    };

    if config.logging.json {
        logger::init_json_logger(&config.logging.level, cli.verbose);
    } else {
        logger::init_cli_logger(&config.logging.level, cli.verbose);
    }
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    let command = cli.selected_command();

    if let Command::Dockerfile { variant } = command {
        print!("{}", ContainerRecipe::from_config(variant, &config).render_dockerfile());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers)
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let result = runtime.block_on(run(command, &config));

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

async fn run(command: Command, config: &StudioConfig) -> manim_studio::Result<()> {
    let monitor = matches!(&command, Command::Serve(args) if args.monitor);
    let studio = Arc::new(build_studio(config, monitor)?);

    match command {
        Command::Serve(_) => {
            tracing::info!(
                "Starting manim-studio with {} workers, {}s request timeout",
                config.server.workers,
                config.server.timeout_seconds
            );
            StudioServer::new(studio, config).start().await
        }
        Command::Generate {
            prompt,
            aspect_ratio,
            quality,
        } => {
            let request = GenerateRequest {
                prompt,
                aspect_ratio: Some(aspect_ratio),
                quality: Some(quality),
            };
            let response = studio.generate(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Suggest => {
            let ideas = studio.suggest_prompts().await?;
            println!("{}", serde_json::to_string_pretty(&ideas)?);
            Ok(())
        }
        Command::Explain { file } => {
            let code = tokio::fs::read_to_string(&file).await?;
            println!("{}", studio.explain_code(&code).await?);
            Ok(())
        }
        Command::Dockerfile { .. } => Ok(()),
    }
}

fn exit_code(e: &StudioError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
