use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use taskboard_store::SqlStore;

use crate::config::Config;

/// Create the schema, and write `config_path` when it does not exist yet
pub async fn execute(config: &Config, config_path: &Path) -> Result<()> {
    println!("{}", "Initializing taskboard...".green().bold());
    println!();

    let store = SqlStore::connect(&config.database.url)
        .await
        .context("Failed to open database")?;
    println!(
        "  {} Schema ready ({:?})",
        "✓".green(),
        store.database_type()
    );

    if config_path.exists() {
        println!(
            "  {} Keeping existing {}",
            "⚠".yellow(),
            config_path.display()
        );
    } else {
        fs::write(config_path, config.to_toml()?)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        println!("  {} Wrote {}", "✓".green(), config_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  taskboard --user <uuid> profile update --username <name>");
    println!("  taskboard --user <uuid> projects create --title <title> --description <text>");
    println!();

    Ok(())
}
