//! Push-channel event types.

use serde::{Deserialize, Serialize};

use super::point_value::PointValue;

/// Lifecycle of a point on the push channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointEventKind {
    /// Subscription acknowledged by the server
    Registered,
    /// A new value was sampled
    Update,
    /// The point was removed or its subscription dropped server-side
    Terminated,
}

/// A notification pushed by the console for a subscribed point
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointEvent {
    /// External id of the point the event concerns
    pub xid: String,

    /// What happened; `event` on the wire
    #[serde(rename = "event")]
    pub kind: PointEventKind,

    /// The sampled value, present for `Update` events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<PointValue>,
}

impl PointEvent {
    /// Creates an Update event carrying a sampled value.
    pub fn update(xid: impl Into<String>, value: PointValue) -> Self {
        Self {
            xid: xid.into(),
            kind: PointEventKind::Update,
            value: Some(value),
        }
    }

    /// Creates a Registered acknowledgement.
    pub fn registered(xid: impl Into<String>) -> Self {
        Self {
            xid: xid.into(),
            kind: PointEventKind::Registered,
            value: None,
        }
    }

    /// Creates a Terminated notification.
    pub fn terminated(xid: impl Into<String>) -> Self {
        Self {
            xid: xid.into(),
            kind: PointEventKind::Terminated,
            value: None,
        }
    }
}
