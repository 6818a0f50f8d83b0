//! Events pushed by the renderer and their hydrated, listener-facing form.
//!
//! DESIGN
//! ======
//! The renderer reports gestures as small JSON descriptors carrying bare
//! entity ids. Decoding happens in two steps: [`EventPayload::decode`] parses
//! the descriptor for a given [`EventKind`], and [`EventPayload::hydrate`]
//! resolves ids against the entity registry. Ids that are no longer loaded
//! are skipped.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::entity::Entity;
use crate::error::DecodeError;
use crate::geo::Coordinates;
use crate::registry::EntityRegistry;

// =============================================================================
// KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Click,
    LongClick,
    Drag,
    Touch,
}

impl EventKind {
    /// Name used by the renderer when pushing the event.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Click => "click",
            Self::LongClick => "longClick",
            Self::Drag => "drag",
            Self::Touch => "touch",
        }
    }
}

impl FromStr for EventKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(Self::Ready),
            "click" => Ok(Self::Click),
            "longClick" => Ok(Self::LongClick),
            "drag" => Ok(Self::Drag),
            "touch" => Ok(Self::Touch),
            other => Err(DecodeError::UnknownEvent(other.to_string())),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of a press gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Down,
    Up,
}

impl TouchAction {
    /// # Errors
    ///
    /// Returns `UnknownTouchAction` for codes other than 0 (down) and 1 (up).
    pub fn from_code(code: i64) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(Self::Down),
            1 => Ok(Self::Up),
            other => Err(DecodeError::UnknownTouchAction(other)),
        }
    }
}

// =============================================================================
// WIRE DESCRIPTORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickDescriptor {
    pub location: Coordinates,
    #[serde(default)]
    pub entity_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchDescriptor {
    #[serde(rename = "type")]
    pub action: i64,
    pub location: Coordinates,
    #[serde(default)]
    pub entity_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDescriptor {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
}

// =============================================================================
// HYDRATED EVENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MapClickEvent {
    pub location: Coordinates,
    /// Loaded entities under the gesture, topmost first.
    pub entities: Vec<Arc<Entity>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapDragEvent {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapTouchEvent {
    pub action: TouchAction,
    pub location: Coordinates,
    pub entities: Vec<Arc<Entity>>,
}

/// A decoded event that still refers to entities by id.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Ready,
    Click(ClickDescriptor),
    LongClick(ClickDescriptor),
    Drag(DragDescriptor),
    Touch(TouchDescriptor),
}

/// An event ready for delivery to its listener.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Ready,
    Click(MapClickEvent),
    LongClick(MapClickEvent),
    Drag(MapDragEvent),
    Touch(MapTouchEvent),
}

impl MapEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready => EventKind::Ready,
            Self::Click(_) => EventKind::Click,
            Self::LongClick(_) => EventKind::LongClick,
            Self::Drag(_) => EventKind::Drag,
            Self::Touch(_) => EventKind::Touch,
        }
    }
}

impl EventPayload {
    /// Parse the descriptor for `kind`. `ready` ignores its payload.
    ///
    /// # Errors
    ///
    /// Returns `MissingPayload` when a gesture arrives without data and
    /// `Json` when the descriptor is malformed.
    pub fn decode(kind: EventKind, json: Option<&str>) -> Result<Self, DecodeError> {
        if kind == EventKind::Ready {
            return Ok(Self::Ready);
        }
        let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
            return Err(DecodeError::MissingPayload(kind.as_str()));
        };
        Ok(match kind {
            EventKind::Ready => Self::Ready,
            EventKind::Click => Self::Click(serde_json::from_str(json)?),
            EventKind::LongClick => Self::LongClick(serde_json::from_str(json)?),
            EventKind::Drag => Self::Drag(serde_json::from_str(json)?),
            EventKind::Touch => Self::Touch(serde_json::from_str(json)?),
        })
    }

    /// Resolve entity ids and validate enumerated fields.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTouchAction` for an unrecognized touch type.
    pub fn hydrate(self, registry: &EntityRegistry) -> Result<MapEvent, DecodeError> {
        Ok(match self {
            Self::Ready => MapEvent::Ready,
            Self::Click(d) => MapEvent::Click(click_event(d, registry)),
            Self::LongClick(d) => MapEvent::LongClick(click_event(d, registry)),
            Self::Drag(d) => {
                MapEvent::Drag(MapDragEvent { start_location: d.start_location, end_location: d.end_location })
            }
            Self::Touch(d) => MapEvent::Touch(MapTouchEvent {
                action: TouchAction::from_code(d.action)?,
                location: d.location,
                entities: resolve(d.entity_ids.as_deref(), registry),
            }),
        })
    }
}

fn click_event(d: ClickDescriptor, registry: &EntityRegistry) -> MapClickEvent {
    MapClickEvent { location: d.location, entities: resolve(d.entity_ids.as_deref(), registry) }
}

fn resolve(ids: Option<&[String]>, registry: &EntityRegistry) -> Vec<Arc<Entity>> {
    let Some(ids) = ids else {
        return Vec::new();
    };
    let (found, missing) = registry.resolve(ids);
    for id in &missing {
        debug!(%id, "event: skipping entity that is not loaded");
    }
    found
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
