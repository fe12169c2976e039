use serde::{Deserialize, Serialize};

use super::point_value::PointValue;

/// Server-side aggregate over a point's values in a time window
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointStatistics {
    /// Number of samples in the window
    pub count: u64,

    /// Earliest sample in the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<PointValue>,

    /// Latest sample in the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<PointValue>,

    /// Smallest sample in the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<PointValue>,

    /// Largest sample in the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<PointValue>,

    /// Time-weighted average over the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,

    /// Sum of samples in the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,

    /// Time integral over the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integral: Option<f64>,

    /// Change from the first to the last sample
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

impl PointStatistics {
    /// Whether the window held any samples at all
    pub fn has_data(&self) -> bool {
        self.count > 0
    }

    /// Change over the window: the server's delta when present, otherwise
    /// computed from the first and last samples
    pub fn change(&self) -> Option<f64> {
        if let Some(delta) = self.delta {
            return Some(delta);
        }
        match (&self.first, &self.last) {
            (Some(first), Some(last)) => Some(last.value - first.value),
            _ => None,
        }
    }
}
