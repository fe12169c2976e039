use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single sampled value of a data point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    /// Sample timestamp
    pub timestamp: DateTime<Utc>,

    /// Numeric value
    pub value: f64,

    /// Server-rendered display string, when the point carries a text renderer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

impl PointValue {
    /// Create a new point value with no rendered text
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp,
            value,
            rendered: None,
        }
    }

    /// Create a point value with the server's rendered display string
    pub fn rendered(timestamp: DateTime<Utc>, value: f64, rendered: String) -> Self {
        Self {
            timestamp,
            value,
            rendered: Some(rendered),
        }
    }
}

/// A value to write back to a settable point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointWrite {
    /// Numeric value to set
    pub value: f64,

    /// Explicit sample timestamp; the server stamps receipt time when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Optional operator annotation stored with the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl PointWrite {
    /// Create a plain write with no timestamp or annotation
    pub fn new(value: f64) -> Self {
        Self {
            value,
            timestamp: None,
            annotation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_value_new() {
        let value = PointValue::new(Utc::now(), 21.5);
        assert_eq!(value.value, 21.5);
        assert!(value.rendered.is_none());
    }

    #[test]
    fn test_point_value_rendered() {
        let value = PointValue::rendered(Utc::now(), 21.5, "21.5 °C".to_string());
        assert_eq!(value.rendered.as_deref(), Some("21.5 °C"));
    }

    #[test]
    fn test_point_write_new() {
        let write = PointWrite::new(42.0);
        assert_eq!(write.value, 42.0);
        assert!(write.timestamp.is_none());
        assert!(write.annotation.is_none());
    }
}
