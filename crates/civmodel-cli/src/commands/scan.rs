//! Scan the exploration/activation plane.

use anyhow::Result;
use civmodel::prelude::*;
use civmodel::runtime::phase::{DEFAULT_MIN_GRADIENT, DEFAULT_PHASE_THRESHOLD};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use super::{is_csv, write_text};
use crate::config::{parse_seeds, Config};

pub struct ScanArgs {
    pub resolution: Option<usize>,
    pub seeds: Option<String>,
    pub steps: Option<usize>,
    pub workers: Option<usize>,
    pub output: Option<String>,
}

pub fn run(args: ScanArgs) -> Result<()> {
    let config = Config::load()?;
    let mut settings = config.scan;
    if let Some(r) = args.resolution {
        settings.exploration_points = r;
        settings.activation_points = r;
    }
    if let Some(list) = &args.seeds {
        settings.seeds = parse_seeds(list)?;
    }
    if let Some(steps) = args.steps {
        settings.steps = steps;
    }
    if let Some(workers) = args.workers {
        settings.workers = Some(workers);
    }

    let plan = settings.plan();
    plan.validate()?;

    let mut scanner = ParameterScanner::new(config.model);
    if let Some(workers) = settings.workers {
        scanner = scanner.with_workers(workers);
    }

    println!(
        "{} Scanning {}x{} grid, {} seeds, {} steps per run...",
        "→".blue(),
        plan.exploration.points.to_string().cyan(),
        plan.activation.points.to_string().cyan(),
        plan.seeds.len().to_string().cyan(),
        plan.steps.to_string().cyan(),
    );

    let pb = ProgressBar::new(plan.total_runs() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} runs ({eta})")?
            .progress_chars("#>-"),
    );
    let grid = scanner.scan_with_progress(&plan, |done, _| pb.set_position(done as u64))?;
    pb.finish_and_clear();

    println!("{} Scan complete!", "✓".green().bold());

    match detect_critical_point(&grid, settings.sigma, DEFAULT_MIN_GRADIENT) {
        Some(point) => println!(
            "  Critical point:  exploration {}, activation {} (gradient {:.3})",
            format!("{:.3}", point.exploration).green(),
            format!("{:.3}", point.activation).green(),
            point.gradient
        ),
        None => println!("  {} No clear critical point", "•".yellow()),
    }

    let mask = phase_boundary(&grid, DEFAULT_PHASE_THRESHOLD);
    println!(
        "  Innovative phase: {:.1}% of the plane (rate > {})",
        phase_area(&mask) * 100.0,
        DEFAULT_PHASE_THRESHOLD
    );

    let s = sensitivity(&grid);
    println!("  Importance:");
    println!("    activation   {:>5.1}%", s.importance_activation);
    println!("    exploration  {:>5.1}%", s.importance_exploration);
    println!("    interaction  {:>5.1}%", s.interaction);

    if let Some(out) = &args.output {
        let path = Path::new(out);
        if is_csv(path) {
            write_text(path, &grid_to_csv(&grid))?;
        } else {
            civmodel::runtime::export::write_json(&grid, path)?;
        }
        println!("  {} Wrote {}", "✓".green(), path.display());
    }

    Ok(())
}
