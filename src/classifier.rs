// src/classifier.rs
//
// Classification seam. In simulation the light feed already carries
// ground truth, so the default implementation passes it through; a
// camera-based classifier implements the same trait and slots in
// without touching the rest of the pipeline.

use crate::types::{LightObservation, LightState};

pub trait LightClassifier {
    fn classify(&self, observation: &LightObservation) -> LightState;
}

/// Trusts the ground-truth state reported by the simulator feed.
pub struct GroundTruthClassifier;

impl LightClassifier for GroundTruthClassifier {
    fn classify(&self, observation: &LightObservation) -> LightState {
        observation.state
    }
}
