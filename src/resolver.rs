// src/resolver.rs
//
// Picks which stop line the vehicle has to care about: the one whose
// nearest route waypoint is at or ahead of the vehicle's own route
// position, with the smallest gap in waypoint steps.

use crate::classifier::LightClassifier;
use crate::route_index::RouteIndex;
use crate::types::{LightObservation, LightState, Point};
use thiserror::Error;
use tracing::debug;

/// The stop-line list and the light feed must stay index-aligned; a
/// length mismatch means an upstream producer broke the data contract.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{stop_lines} stop lines but {observations} light observations")]
pub struct MismatchedLightDataError {
    pub stop_lines: usize,
    pub observations: usize,
}

pub struct StopLineResolver {
    stop_lines: Vec<Point>,
}

impl StopLineResolver {
    pub fn new(stop_lines: Vec<Point>) -> Self {
        Self { stop_lines }
    }

    /// Nearest stop line at or ahead of the vehicle, paired with the
    /// classified color of its light. `None` when every line is behind
    /// the vehicle or no lights are configured.
    ///
    /// Lights are scanned linearly instead of going through a spatial
    /// index: there are a handful of lights against thousands of
    /// waypoints, so one route query per light is already cheap.
    pub fn nearest_ahead(
        &self,
        route: &RouteIndex,
        car_wp: usize,
        lights: &[LightObservation],
        classifier: &dyn LightClassifier,
    ) -> Result<Option<(usize, LightState)>, MismatchedLightDataError> {
        if self.stop_lines.len() != lights.len() {
            return Err(MismatchedLightDataError {
                stop_lines: self.stop_lines.len(),
                observations: lights.len(),
            });
        }

        let mut closest_gap = route.len() as i64;
        let mut winner: Option<(usize, usize)> = None;

        for (i, line) in self.stop_lines.iter().enumerate() {
            let (line_wp, _) = route.closest(*line);

            // Signed step gap, no wraparound: on a looping route a stop
            // line just past the seam does not count as ahead of a
            // vehicle near end-of-route on the same lap.
            let gap = line_wp as i64 - car_wp as i64;

            // Strict `<` keeps the earlier line on equal gaps.
            if gap >= 0 && gap < closest_gap {
                closest_gap = gap;
                winner = Some((i, line_wp));
            }
        }

        Ok(winner.map(|(i, line_wp)| {
            let state = classifier.classify(&lights[i]);
            debug!(
                "stop line {} at waypoint {} is {} steps ahead, light {:?}",
                i, line_wp, closest_gap, state
            );
            (line_wp, state)
        }))
    }
}
