//! List the historical presets.

use anyhow::Result;
use civmodel::prelude::*;
use colored::Colorize;

pub fn run() -> Result<()> {
    println!("{}", "Historical presets".bold());
    println!();
    for preset in HistoricalPreset::ALL {
        let config = preset.config();
        println!(
            "  {:<24} exploration {:.2}  activation {:.2}  N={}  d={}",
            preset.name().cyan(),
            config.exploration,
            config.activation,
            config.population,
            config.dimensions,
        );
        println!("  {:<24} {}", "", preset.description().dimmed());
    }
    println!();
    println!("Run one with {}", "civmodel run --preset <name>".cyan());
    Ok(())
}
