// src/detector.rs
//
// Per-cycle orchestration. Everything the cycle needs arrives frozen
// in a CycleSnapshot; the only state that survives between cycles is
// the stabilizer's committed decision (plus the route, which is
// replaced wholesale when a new one arrives).

use crate::classifier::{GroundTruthClassifier, LightClassifier};
use crate::resolver::StopLineResolver;
use crate::route_index::{EmptyRouteError, RouteIndex};
use crate::stabilizer::LightStateStabilizer;
use crate::types::{Config, CycleSnapshot, LightState, Point};
use tracing::{error, info, warn};

pub struct TrafficLightDetector {
    route: Option<RouteIndex>,
    resolver: StopLineResolver,
    classifier: Box<dyn LightClassifier>,
    stabilizer: LightStateStabilizer,
}

impl TrafficLightDetector {
    pub fn new(config: &Config) -> Self {
        let stop_lines: Vec<Point> = config.stop_lines.iter().map(|&p| Point::from(p)).collect();
        info!("Detector ready: {} stop lines configured", stop_lines.len());

        Self {
            route: None,
            resolver: StopLineResolver::new(stop_lines),
            classifier: Box::new(GroundTruthClassifier),
            stabilizer: LightStateStabilizer::new(config.detector.state_count_threshold),
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn LightClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the route wholesale. Rebuilds the spatial index; an
    /// empty route clears it, and cycles skip until a usable one
    /// arrives.
    pub fn set_route(&mut self, route: Vec<Point>) {
        match RouteIndex::new(route) {
            Ok(index) => {
                info!("Route loaded: {} waypoints", index.len());
                self.route = Some(index);
            }
            Err(EmptyRouteError) => {
                warn!("Empty route received, detector not ready");
                self.route = None;
            }
        }
    }

    /// One observation cycle. `None` means the cycle was skipped and
    /// nothing should be published: the detector is not ready yet, or
    /// the light feed broke its contract.
    pub fn process_cycle(&mut self, snapshot: &CycleSnapshot) -> Option<i64> {
        let route = self.route.as_ref()?;
        let pose = snapshot.pose?;

        let (car_wp, _) = route.closest(pose);

        let resolved = match self.resolver.nearest_ahead(
            route,
            car_wp,
            &snapshot.lights,
            self.classifier.as_ref(),
        ) {
            Ok(resolved) => resolved,
            Err(e) => {
                error!("Light data contract violation, dropping cycle: {}", e);
                return None;
            }
        };

        let published = match resolved {
            Some((line_wp, state)) => self.stabilizer.update(line_wp as i64, state),
            None => self.stabilizer.update(-1, LightState::Unknown),
        };

        Some(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DetectorConfig, LightObservation, LoggingConfig, ScenarioConfig};

    fn test_config(stop_lines: Vec<[f64; 2]>) -> Config {
        Config {
            detector: DetectorConfig {
                state_count_threshold: 3,
            },
            stop_lines,
            scenario: ScenarioConfig {
                input_dir: "scenarios".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    fn straight_route(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, 0.0)).collect()
    }

    fn snapshot(pose: Option<(f64, f64)>, states: &[LightState]) -> CycleSnapshot {
        CycleSnapshot {
            pose: pose.map(|(x, y)| Point::new(x, y)),
            lights: states
                .iter()
                .map(|&state| LightObservation { state })
                .collect(),
        }
    }

    #[test]
    fn test_cycle_skipped_without_route() {
        let mut detector = TrafficLightDetector::new(&test_config(vec![[3.0, 0.0]]));

        let result = detector.process_cycle(&snapshot(Some((1.0, 0.0)), &[LightState::Red]));
        assert_eq!(result, None);
    }

    #[test]
    fn test_cycle_skipped_without_pose() {
        let mut detector = TrafficLightDetector::new(&test_config(vec![[3.0, 0.0]]));
        detector.set_route(straight_route(5));

        let result = detector.process_cycle(&snapshot(None, &[LightState::Red]));
        assert_eq!(result, None);
    }

    #[test]
    fn test_empty_route_keeps_detector_not_ready() {
        let mut detector = TrafficLightDetector::new(&test_config(vec![[3.0, 0.0]]));
        detector.set_route(Vec::new());

        let result = detector.process_cycle(&snapshot(Some((1.0, 0.0)), &[LightState::Red]));
        assert_eq!(result, None);
    }

    #[test]
    fn test_red_light_published_after_stabilizing() {
        let mut detector = TrafficLightDetector::new(&test_config(vec![[3.0, 0.0]]));
        detector.set_route(straight_route(5));

        let input = snapshot(Some((1.1, 0.0)), &[LightState::Red]);
        for _ in 0..3 {
            assert_eq!(detector.process_cycle(&input), Some(-1));
        }
        assert_eq!(detector.process_cycle(&input), Some(3));
    }

    #[test]
    fn test_contract_violation_drops_cycle_but_not_detector() {
        let mut detector = TrafficLightDetector::new(&test_config(vec![[3.0, 0.0]]));
        detector.set_route(straight_route(5));

        // Two observations against one configured stop line.
        let bad = snapshot(Some((1.0, 0.0)), &[LightState::Red, LightState::Red]);
        assert_eq!(detector.process_cycle(&bad), None);

        // The next well-formed cycle proceeds normally.
        let good = snapshot(Some((1.0, 0.0)), &[LightState::Red]);
        assert_eq!(detector.process_cycle(&good), Some(-1));
    }

    #[test]
    fn test_all_lines_behind_feeds_unknown() {
        let mut detector = TrafficLightDetector::new(&test_config(vec![[3.0, 0.0]]));
        detector.set_route(straight_route(12));

        // Stabilize a red stop at waypoint 3 first.
        let before = snapshot(Some((1.0, 0.0)), &[LightState::Red]);
        for _ in 0..4 {
            detector.process_cycle(&before);
        }
        assert_eq!(detector.process_cycle(&before), Some(3));

        // Drive past the line: no candidate, so Unknown feeds the
        // stabilizer and eventually clears the decision.
        let past = snapshot(Some((8.0, 0.0)), &[LightState::Red]);
        for _ in 0..3 {
            assert_eq!(detector.process_cycle(&past), Some(3));
        }
        assert_eq!(detector.process_cycle(&past), Some(-1));
    }

    // Stand-in for a camera-based classifier: ignores ground truth.
    struct AlwaysRed;

    impl LightClassifier for AlwaysRed {
        fn classify(&self, _observation: &LightObservation) -> LightState {
            LightState::Red
        }
    }

    #[test]
    fn test_custom_classifier_overrides_ground_truth() {
        let mut detector = TrafficLightDetector::new(&test_config(vec![[3.0, 0.0]]))
            .with_classifier(Box::new(AlwaysRed));
        detector.set_route(straight_route(5));

        // The feed says green, the classifier says red.
        let input = snapshot(Some((1.0, 0.0)), &[LightState::Green]);
        for _ in 0..3 {
            assert_eq!(detector.process_cycle(&input), Some(-1));
        }
        assert_eq!(detector.process_cycle(&input), Some(3));
    }

    #[test]
    fn test_route_replacement_resets_nothing_but_the_index() {
        let mut detector = TrafficLightDetector::new(&test_config(vec![[3.0, 0.0]]));
        detector.set_route(straight_route(5));

        let input = snapshot(Some((1.0, 0.0)), &[LightState::Red]);
        for _ in 0..4 {
            detector.process_cycle(&input);
        }

        // A denser replacement route moves the stop line's waypoint;
        // the stabilized Red carries over and tracks the new index.
        let dense: Vec<Point> = (0..10).map(|i| Point::new(i as f64 * 0.5, 0.0)).collect();
        detector.set_route(dense);
        assert_eq!(detector.process_cycle(&input), Some(6));
    }
}
