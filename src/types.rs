use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub detector: DetectorConfig,
    /// One stop line per known intersection, ordered like the light
    /// observation feed.
    pub stop_lines: Vec<[f64; 2]>,
    pub scenario: ScenarioConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Consecutive identical observations required before a light state
    /// is allowed to change the published decision.
    pub state_count_threshold: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub input_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightState {
    Red,
    Yellow,
    Green,
    Unknown,
}

/// What the light feed reports for one light on one cycle. Carries the
/// simulator's ground-truth color; a camera frame handle would ride
/// along here once a real classifier exists.
#[derive(Debug, Clone, Copy)]
pub struct LightObservation {
    pub state: LightState,
}

/// Immutable per-cycle input. Producers update pose and lights between
/// cycles; the detector only ever sees them frozen into a snapshot.
#[derive(Debug, Clone)]
pub struct CycleSnapshot {
    pub pose: Option<Point>,
    pub lights: Vec<LightObservation>,
}
