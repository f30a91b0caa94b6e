//! One-shot points milestone.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDetector {
    threshold: u64,
    reached: bool,
}

impl MilestoneDetector {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            reached: false,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }

    /// Check a pending credit against the threshold.
    ///
    /// Returns `true` exactly once: the first time `current + earned`
    /// reaches the threshold. Never re-arms.
    pub fn check(&mut self, current_points: u64, earned_points: u64) -> bool {
        if self.reached || current_points.saturating_add(earned_points) < self.threshold {
            return false;
        }
        self.reached = true;
        true
    }
}

impl Default for MilestoneDetector {
    fn default() -> Self {
        Self::new(100)
    }
}
