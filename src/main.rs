use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use aitrainer::config::Config;
use aitrainer::context::AppContext;
use commands::{
    ConfigCommand, GenerateCommand, MatchCommand, SettingsCommand, SyncCommand, WorkoutCommand,
};

#[derive(Parser)]
#[command(name = "aitrainer")]
#[command(version)]
#[command(about = "AI personal trainer: generate workouts and sync them with Hevy", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync workouts with Hevy
    Sync(SyncCommand),

    /// Manage stored workouts
    Workout(WorkoutCommand),

    /// Generate a workout with the language model
    Generate(GenerateCommand),

    /// Match an exercise name against the Hevy catalog
    Match(MatchCommand),

    /// Manage user settings
    Settings(SettingsCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aitrainer=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Sync(cmd)) => {
            let context = AppContext::from_config(&config).await?;
            cmd.run(&context).await?;
        }
        Some(Commands::Workout(cmd)) => {
            let context = AppContext::from_config(&config).await?;
            cmd.run(&context).await?;
        }
        Some(Commands::Generate(cmd)) => {
            let context = AppContext::from_config(&config).await?;
            cmd.run(&context).await?;
        }
        Some(Commands::Match(cmd)) => {
            let context = AppContext::from_config(&config).await?;
            cmd.run(&context).await?;
        }
        Some(Commands::Settings(cmd)) => {
            let context = AppContext::from_config(&config).await?;
            cmd.run(&context).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
