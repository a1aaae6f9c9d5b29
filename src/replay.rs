// src/replay.rs
//
// Offline scenario driver. The live system is fed by pose/route/light
// topics; here a recorded scenario file supplies the same stream of
// observation cycles so a run is reproducible end to end.

use crate::detector::TrafficLightDetector;
use crate::types::{CycleSnapshot, LightObservation, LightState, Point};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Ordered route waypoints, loaded once per scenario.
    pub route: Vec<[f64; 2]>,
    pub cycles: Vec<CycleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CycleRecord {
    /// Missing pose models the startup window before localization.
    #[serde(default)]
    pub pose: Option<[f64; 2]>,
    #[serde(default)]
    pub lights: Vec<LightState>,
}

#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_cycles: u64,
    pub skipped_cycles: u64,
    pub published_changes: u64,
    pub red_stop_cycles: u64,
}

pub fn find_scenario_files(input_dir: &str) -> Result<Vec<PathBuf>> {
    let mut scenarios = Vec::new();

    for entry in WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if let Some(ext) = path.extension() {
            if ext == "yaml" || ext == "yml" {
                scenarios.push(path.to_path_buf());
            }
        }
    }
    scenarios.sort();

    info!("Found {} scenario files", scenarios.len());
    Ok(scenarios)
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let scenario: Scenario = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(scenario)
}

/// Feed every recorded cycle through the detector, logging each change
/// of the published stop waypoint.
pub fn run(detector: &mut TrafficLightDetector, scenario: &Scenario) -> ReplayStats {
    detector.set_route(scenario.route.iter().map(|&p| Point::from(p)).collect());

    let mut stats = ReplayStats::default();
    let mut last_published: Option<i64> = None;

    for (cycle_idx, record) in scenario.cycles.iter().enumerate() {
        let input = CycleSnapshot {
            pose: record.pose.map(Point::from),
            lights: record
                .lights
                .iter()
                .map(|&state| LightObservation { state })
                .collect(),
        };

        stats.total_cycles += 1;
        match detector.process_cycle(&input) {
            Some(wp) => {
                if last_published != Some(wp) {
                    info!("Cycle {}: publishing stop waypoint {}", cycle_idx, wp);
                    stats.published_changes += 1;
                    last_published = Some(wp);
                }
                if wp >= 0 {
                    stats.red_stop_cycles += 1;
                }
            }
            None => stats.skipped_cycles += 1,
        }
    }

    stats
}
