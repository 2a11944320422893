//! Initialize a civmodel project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing civmodel project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} civmodel project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} civmodel run --exploration 0.85 --activation 0.8", "1.".blue());
    println!("  {} civmodel scan --output grid.json", "2.".blue());
    println!("  {} civmodel presets", "3.".blue());

    Ok(())
}
