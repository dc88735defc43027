//! Routing decision type

use super::agent::AgentId;
use serde::{Deserialize, Serialize};

/// Highest confidence the router will ever report
pub const MAX_CONFIDENCE: f64 = 95.0;

/// Where a message goes and how sure the router is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    /// Chosen agent
    pub destination: AgentId,
    /// Confidence in [0, 95]
    pub confidence: f64,
}

impl RoutingDecision {
    /// Create a decision, clamping confidence into [0, 95]
    pub fn new(destination: AgentId, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, MAX_CONFIDENCE)
        };
        Self {
            destination,
            confidence,
        }
    }
}
