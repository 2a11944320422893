//! Engine behaviour across the documented regimes.
//!
//! Run with: cargo test -p civmodel-runtime --test model_dynamics

use civmodel_runtime::prelude::*;
use proptest::prelude::*;

const SEEDS: [u64; 5] = [42, 43, 44, 45, 46];

/// Innovation rate averaged over a handful of seeds.
fn mean_rate(exploration: f64, activation: f64, steps: usize) -> f64 {
    let total: f64 = SEEDS
        .iter()
        .map(|&seed| {
            let config = RunConfig::new(exploration, activation).with_seed(seed);
            Engine::new(config).unwrap().run(steps).unwrap().summary.innovation_rate
        })
        .sum();
    total / SEEDS.len() as f64
}

#[test]
fn same_seed_replays_identically() {
    let config = RunConfig::new(0.75, 0.3).with_seed(42);
    let a = Engine::new(config.clone()).unwrap().run(150).unwrap();
    let b = Engine::new(config).unwrap().run(150).unwrap();
    assert_eq!(a.innovations, b.innovations);
    assert_eq!(a.synergies, b.synergies);
    assert_eq!(a.summary, b.summary);
}

#[test]
fn different_seeds_diverge() {
    let a = Engine::new(RunConfig::new(0.75, 0.3).with_seed(1)).unwrap().run(50).unwrap();
    let b = Engine::new(RunConfig::new(0.75, 0.3).with_seed(2)).unwrap().run(50).unwrap();
    assert_ne!(a.synergies, b.synergies);
}

#[test]
fn stagnant_regime_barely_innovates() {
    let rate = mean_rate(0.3, 0.0, 300);
    assert!(rate < 0.05, "stagnant regime rate {}", rate);
}

#[test]
fn window_regime_innovates_intermittently() {
    let rate = mean_rate(0.75, 0.3, 300);
    assert!((0.10..=0.30).contains(&rate), "intermediate regime rate {}", rate);
}

#[test]
fn activated_regime_innovates_persistently() {
    let rate = mean_rate(0.85, 0.8, 300);
    assert!(rate > 0.50, "activated regime rate {}", rate);
}

#[test]
fn rate_rises_with_activation() {
    let low = mean_rate(0.8, 0.1, 200);
    let high = mean_rate(0.8, 0.9, 200);
    assert!(high > low, "low {} high {}", low, high);
}

#[test]
fn zero_noise_never_innovates() {
    let config = RunConfig::new(0.9, 0.9).with_noise_scale(0.0);
    let out = Engine::new(config).unwrap().run(200).unwrap();
    assert_eq!(out.summary.total_innovations, 0);
    assert_eq!(out.summary.innovation_rate, 0.0);

    let silent = RunConfig::new(0.0, 0.0).with_noise_scale(0.0);
    let out = Engine::new(silent).unwrap().run(300).unwrap();
    assert_eq!(out.summary.total_innovations, 0);
}

#[test]
fn repeated_runs_continue_from_current_state() {
    let config = RunConfig::new(0.8, 0.5).with_seed(3);
    let mut split = Engine::new(config.clone()).unwrap();
    let first = split.run(40).unwrap();
    let second = split.run(60).unwrap();
    assert_eq!(second.summary.steps, 60);
    assert_eq!(second.records[0].step, 41);

    let whole = Engine::new(config).unwrap().run(100).unwrap();
    let mut joined = first.innovations.clone();
    joined.extend(&second.innovations);
    assert_eq!(joined, whole.innovations);
}

#[test]
fn warmup_changes_rate_denominator() {
    let config = RunConfig::new(0.85, 0.8).with_seed(11).with_warmup(50);
    let out = Engine::new(config).unwrap().run(150).unwrap();
    let counted = out.innovations[50..].iter().filter(|&&f| f).count();
    assert_eq!(out.summary.innovation_rate, counted as f64 / 100.0);
}

#[test]
fn gated_synergy_stays_at_baseline() {
    let synergy = SynergyConfig {
        activation_gate: 0.5,
        ..SynergyConfig::default()
    };
    let config = RunConfig::new(0.8, 0.3).with_synergy(synergy);
    let out = Engine::new(config).unwrap().run(30).unwrap();
    assert!(out.synergies.iter().all(|&s| s == 1.0));
}

#[test]
fn presets_run_to_completion() {
    for preset in HistoricalPreset::ALL {
        let mut engine = Engine::new(preset.config()).unwrap();
        let out = engine.run(20).unwrap();
        assert_eq!(out.summary.steps, 20, "{}", preset);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn synergy_never_below_baseline(
        exploration in 0.0f64..=1.0,
        activation in 0.0f64..=1.0,
        seed in 0u64..1_000,
    ) {
        let config = RunConfig::new(exploration, activation)
            .with_seed(seed)
            .with_population(20)
            .with_dimensions(2);
        let out = Engine::new(config).unwrap().run(15).unwrap();
        prop_assert!(out.synergies.iter().all(|&s| s >= 1.0));
    }

    #[test]
    fn summary_counts_match_flags(seed in 0u64..1_000, steps in 1usize..40) {
        let config = RunConfig::new(0.9, 0.7).with_seed(seed).with_population(16);
        let out = Engine::new(config).unwrap().run(steps).unwrap();
        let count = out.innovations.iter().filter(|&&f| f).count();
        prop_assert_eq!(out.summary.total_innovations, count);
        prop_assert!((out.summary.innovation_rate - count as f64 / steps as f64).abs() < 1e-12);
    }
}
