// src/main.rs

mod classifier;
mod config;
mod detector;
mod replay;
mod resolver;
mod route_index;
mod stabilizer;
mod types;

use anyhow::Result;
use tracing::{error, info};

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let config = types::Config::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("redlight_detection={}", config.logging.level))
        .init();

    info!("🚦 Traffic Light Detection System Starting");
    info!("✓ Configuration loaded from {}", config_path);
    info!(
        "Stop lines: {}, state count threshold: {}",
        config.stop_lines.len(),
        config.detector.state_count_threshold
    );

    let scenario_files = replay::find_scenario_files(&config.scenario.input_dir)?;
    if scenario_files.is_empty() {
        error!("No scenario files found in {}", config.scenario.input_dir);
        return Ok(());
    }

    for (idx, path) in scenario_files.iter().enumerate() {
        info!("========================================");
        info!(
            "Replaying scenario {}/{}: {}",
            idx + 1,
            scenario_files.len(),
            path.display()
        );
        info!("========================================");

        let scenario = match replay::load_scenario(path) {
            Ok(scenario) => scenario,
            Err(e) => {
                error!("Skipping {}: {:#}", path.display(), e);
                continue;
            }
        };

        let mut detector = detector::TrafficLightDetector::new(&config);
        let stats = replay::run(&mut detector, &scenario);

        info!("✓ Scenario complete");
        info!("  Total cycles: {}", stats.total_cycles);
        info!(
            "  Skipped (not ready): {} ({:.1}%)",
            stats.skipped_cycles,
            100.0 * stats.skipped_cycles as f64 / stats.total_cycles.max(1) as f64
        );
        info!("  Published value changes: {}", stats.published_changes);
        info!("  Red-stop cycles: {}", stats.red_stop_cycles);
    }

    Ok(())
}
