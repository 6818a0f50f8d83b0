//! Map entities: points, lines and polygons decoded from renderer replies.
//!
//! DESIGN
//! ======
//! `Entity` is a sum type discriminated on the wire by a `type` tag
//! (`point`, `line`, `polygon`). Every variant carries the same
//! `EntityHeader` (id, name, visibility, properties) flattened next to its
//! own geometry fields. Any other tag fails to decode.
//!
//! Entities are read-only snapshots of what the renderer loaded. Style
//! changes go through an editor from [`Entity::edit`], never through
//! mutation.

use serde::{Deserialize, Serialize};

use crate::editor::{Editor, LineEditor, PointEditor, PolygonEditor};
use crate::error::DecodeError;
use crate::geo::{Coordinates, path_length};
use crate::properties::Properties;

/// Icon used for point entities when a layer does not specify one: a white
/// circle with a black stroke.
pub const DEFAULT_POINT_ICON: &str = concat!(
    "data:image/svg+xml,",
    "<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" ",
    "xmlns:xlink=\"http://www.w3.org/1999/xlink\" x=\"0px\" y=\"0px\" width=\"20px\" height=\"20px\" ",
    "xml:space=\"preserve\">",
    "<circle cx=\"10\" cy=\"10\" r=\"9\" stroke=\"black\" stroke-width=\"3\" fill=\"white\" />",
    "</svg>",
);

// =============================================================================
// HEADER
// =============================================================================

/// Fields shared by every entity variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHeader {
    pub(crate) id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(rename = "isVisible", default = "visible_by_default")]
    pub(crate) visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) properties: Option<Properties>,
}

fn visible_by_default() -> bool {
    true
}

// =============================================================================
// VARIANTS
// =============================================================================

/// A single located marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(flatten)]
    header: EntityHeader,
    location: Coordinates,
}

impl Point {
    #[must_use]
    pub fn location(&self) -> Coordinates {
        self.location
    }

    #[must_use]
    pub fn edit(&self) -> PointEditor {
        PointEditor::new(&self.header.id)
    }
}

/// A polyline; straight segments join consecutive path points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(flatten)]
    header: EntityHeader,
    path: Vec<Coordinates>,
}

impl Line {
    /// Length of the path in meters.
    #[must_use]
    pub fn length(&self) -> f64 {
        path_length(&self.path)
    }

    /// Number of points along the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    #[must_use]
    pub fn point_at(&self, index: usize) -> Option<Coordinates> {
        self.path.get(index).copied()
    }

    #[must_use]
    pub fn path(&self) -> &[Coordinates] {
        &self.path
    }

    #[must_use]
    pub fn edit(&self) -> LineEditor {
        LineEditor::new(&self.header.id)
    }
}

/// A closed ring; the last perimeter point repeats the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(flatten)]
    header: EntityHeader,
    perimeter: Vec<Coordinates>,
}

impl Polygon {
    /// Length of the boundary in meters.
    #[must_use]
    pub fn perimeter_length(&self) -> f64 {
        path_length(&self.perimeter)
    }

    /// Enclosed area in square meters.
    #[must_use]
    pub fn area(&self) -> f64 {
        // TODO: spherical excess area once `Coordinates::distance_to` is geodesic.
        0.0
    }

    #[must_use]
    pub fn perimeter(&self) -> &[Coordinates] {
        &self.perimeter
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.perimeter.first(), self.perimeter.last()) {
            (Some(first), Some(last)) => self.perimeter.len() > 1 && first == last,
            _ => false,
        }
    }

    #[must_use]
    pub fn edit(&self) -> PolygonEditor {
        PolygonEditor::new(&self.header.id)
    }
}

// =============================================================================
// ENTITY
// =============================================================================

/// Discriminator values used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Point,
    Line,
    Polygon,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Polygon => "polygon",
        }
    }
}

/// Any entity loaded on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Point(Point),
    Line(Line),
    Polygon(Polygon),
}

impl Entity {
    /// Decode a single entity from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input or an unsupported `type` tag.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn header(&self) -> &EntityHeader {
        match self {
            Self::Point(p) => &p.header,
            Self::Line(l) => &l.header,
            Self::Polygon(p) => &p.header,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Point(_) => EntityKind::Point,
            Self::Line(_) => EntityKind::Line,
            Self::Polygon(_) => EntityKind::Polygon,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.header().id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.header().name.as_deref()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.header().visible
    }

    #[must_use]
    pub fn properties(&self) -> Option<&Properties> {
        self.header().properties.as_ref()
    }

    #[must_use]
    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Self::Line(l) => Some(l),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Self::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// Start a style editor matching this entity's variant.
    #[must_use]
    pub fn edit(&self) -> Editor {
        match self {
            Self::Point(p) => Editor::Point(p.edit()),
            Self::Line(l) => Editor::Line(l.edit()),
            Self::Polygon(p) => Editor::Polygon(p.edit()),
        }
    }
}

#[cfg(test)]
#[path = "entity_test.rs"]
mod tests;
