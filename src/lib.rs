//! mapbridge: host-side control layer for an embedded web map renderer.
//!
//! ARCHITECTURE
//! ============
//! The renderer is a script engine reached only by evaluating commands and
//! answering through callbacks and pushed events. This crate provides the
//! typed side of that boundary:
//!
//! - data model: [`geo`], [`color`], [`properties`], [`entity`], [`layer`]
//! - mutation: [`editor`] (sparse style patches) and [`transaction`]
//! - protocol: [`command`] (outbound), [`event`] (inbound), [`callbacks`]
//!   (reply correlation), [`registry`] (loaded entities)
//! - [`bridge`]: the `MapBridge` handle and its dispatch queue
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod bridge;
pub mod callbacks;
pub mod color;
pub mod command;
pub mod config;
pub mod editor;
pub mod entity;
pub mod error;
pub mod event;
pub mod geo;
pub mod layer;
pub mod properties;
pub mod registry;
pub mod transaction;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use bridge::{Dispatcher, MapBridge, Renderer, spawn_dispatcher};
pub use callbacks::{CallbackRegistry, Continuation};
pub use color::Color;
pub use command::{Command, CommandEncoder};
pub use config::{BridgeConfig, ConfigError};
pub use editor::{Editor, LineEditor, PointEditor, PolygonEditor, StyleEditor};
pub use entity::{DEFAULT_POINT_ICON, Entity, EntityKind, Line, Point, Polygon};
pub use error::{BridgeError, DecodeError, ErrorCode, ValidationError};
pub use event::{EventKind, MapClickEvent, MapDragEvent, MapEvent, MapTouchEvent, TouchAction};
pub use geo::{Coordinates, Rectangle};
pub use layer::{GeoJsonLayerBuilder, GeoJsonLayerDescriptor, Layer, VectorLayer};
pub use properties::{Properties, PropertyError};
pub use registry::EntityRegistry;
pub use transaction::{CommitCallback, EntityManager, EntityTransaction};
