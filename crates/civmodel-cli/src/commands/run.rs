//! Run a single simulation.

use anyhow::Result;
use civmodel::core::presets;
use civmodel::prelude::*;
use colored::Colorize;
use std::path::Path;

use super::{is_csv, write_text};
use crate::config::Config;

/// Steps in the rolling innovation-rate window shown with `--verbose`.
const ROLLING_WINDOW: usize = 50;

pub struct RunArgs {
    pub preset: Option<String>,
    pub exploration: Option<f64>,
    pub activation: Option<f64>,
    pub seed: Option<u64>,
    pub steps: usize,
    pub output: Option<String>,
    pub verbose: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.preset {
        Some(name) => presets::load(name)?,
        None => Config::load()?.model,
    };
    if let Some(e) = args.exploration {
        config = config.with_exploration(e);
    }
    if let Some(a) = args.activation {
        config = config.with_activation(a);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    println!(
        "{} Running {} steps (exploration {}, activation {}, seed {})...",
        "→".blue(),
        args.steps.to_string().cyan(),
        format!("{:.2}", config.exploration).cyan(),
        format!("{:.2}", config.activation).cyan(),
        config.seed.to_string().cyan(),
    );

    let mut engine = Engine::new(config)?;
    let output = engine.run(args.steps)?;
    let summary = &output.summary;

    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!(
        "  Innovations:     {} / {}",
        summary.total_innovations.to_string().green(),
        summary.steps
    );
    println!("  Innovation rate: {}", format!("{:.3}", summary.innovation_rate).green());
    println!("  Mean synergy:    {}", format!("{:.3}", summary.mean_synergy).green());
    println!("  Divergence:      {:.4}", summary.final_divergence);
    println!("  Threshold:       {:.4}", engine.threshold());

    if args.verbose {
        let rolling = rolling_rate(&output.innovations, ROLLING_WINDOW);
        if let (Some(first), Some(last)) = (rolling.first(), rolling.last()) {
            println!(
                "  Rolling rate ({} steps): {:.3} → {:.3}",
                ROLLING_WINDOW, first, last
            );
        }
    }

    if let Some(out) = &args.output {
        let path = Path::new(out);
        if is_csv(path) {
            write_text(path, &trajectory_to_csv(&output.records))?;
        } else {
            civmodel::runtime::export::write_json(&output, path)?;
        }
        println!("  {} Wrote {}", "✓".green(), path.display());
    }

    Ok(())
}
