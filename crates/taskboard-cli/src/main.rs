mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use commands::profile::ProfileCommands;
use commands::projects::ProjectCommands;
use commands::tasks::TaskCommands;
use config::Config;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version, about = "Taskboard CLI - projects, tasks and team profiles", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "taskboard.toml")]
    config: PathBuf,

    /// Database URL (sqlite:... or postgres://...)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Act as this user id
    #[arg(long, global = true)]
    user: Option<Uuid>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema and a default config file
    Init,

    /// Project management commands
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Task management commands
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?
        .apply_env(|key| std::env::var(key).ok())?
        .apply_flags(cli.database_url, cli.user);

    init_tracing(&config.log.level);

    // Execute command
    match cli.command {
        Commands::Init => {
            commands::init::execute(&config, &cli.config).await?;
        }
        Commands::Projects { command } => {
            commands::projects::execute(&config, command).await?;
        }
        Commands::Tasks { command } => {
            commands::tasks::execute(&config, command).await?;
        }
        Commands::Profile { command } => {
            commands::profile::execute(&config, command).await?;
        }
    }

    Ok(())
}
