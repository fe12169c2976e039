//! Strong types for the provider system.
//!
//! These types enforce clear boundaries and prevent mixing of concepts:
//! - `Xid` - The server's stable external identity for a data point
//! - `PointConfiguration` - A point reference plus display-local settings

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Xid
// =============================================================================

/// External identity of a data point on the console server.
///
/// Examples: "pump-7-flow", "tank-2-level", "DP_049221"
///
/// Xids are assigned server-side and stable across renames, which makes
/// them the only safe key for subscriptions and provider bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Xid(pub String);

impl Xid {
    pub fn new(xid: impl Into<String>) -> Self {
        Self(xid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Xid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Xid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Xid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// PointConfiguration
// =============================================================================

/// A data point as configured on one provider.
///
/// Pairs the point reference with whatever display-specific settings the
/// owning component wants carried back to it on delivery (axis binding,
/// series color, gauge range). The provider never inspects `settings`;
/// it only stores and returns them.
///
/// Configurations are immutable once added. Within a provider the xid is
/// unique; adding a second configuration for the same xid is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointConfiguration {
    /// External id of the point
    pub xid: Xid,

    /// Human-readable label for legends and tooltips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Opaque display settings, carried through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

impl PointConfiguration {
    /// Create a bare configuration for a point.
    pub fn new(xid: impl Into<Xid>) -> Self {
        Self {
            xid: xid.into(),
            label: None,
            settings: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = Some(settings);
        self
    }
}
