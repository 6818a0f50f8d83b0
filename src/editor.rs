//! Style editors: sparse patches applied to an entity's appearance.
//!
//! DESIGN
//! ======
//! An editor only records what the caller set. Every optional field starts
//! as `None` and is left out of the wire form until set, so the renderer
//! reads omission as "leave unchanged". `id` is always written since it
//! names the target entity.
//!
//! Serialization is hand-written with one explicit field list per variant:
//! `id`, the shared style fields, then the variant's own fields.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::color::{Color, check_unit};
use crate::error::ValidationError;

// =============================================================================
// SHARED STYLE FIELDS
// =============================================================================

/// Fields every entity editor can set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleFields {
    visibility: Option<bool>,
    color: Option<String>,
    opacity: Option<f64>,
}

impl StyleFields {
    #[must_use]
    pub fn visibility(&self) -> Option<bool> {
        self.visibility
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    #[must_use]
    pub fn opacity(&self) -> Option<f64> {
        self.opacity
    }

    fn write<M: SerializeMap>(&self, map: &mut M, id: &str) -> Result<(), M::Error> {
        map.serialize_entry("id", id)?;
        entry(map, "visibility", self.visibility.as_ref())?;
        entry(map, "color", self.color.as_ref())?;
        entry(map, "opacity", self.opacity.as_ref())
    }
}

fn entry<M: SerializeMap, T: Serialize>(map: &mut M, key: &'static str, value: Option<&T>) -> Result<(), M::Error> {
    match value {
        Some(v) => map.serialize_entry(key, v),
        None => Ok(()),
    }
}

/// Setters shared by all entity editors.
pub trait StyleEditor {
    /// Id of the entity this editor targets.
    fn id(&self) -> &str;

    fn style(&self) -> &StyleFields;

    fn style_mut(&mut self) -> &mut StyleFields;

    fn set_visibility(&mut self, visible: bool) -> &mut Self {
        self.style_mut().visibility = Some(visible);
        self
    }

    /// Set the fill color. Writes `color` (hex) and `opacity` (alpha) as two
    /// separate fields.
    fn set_color(&mut self, color: &Color) -> &mut Self {
        let style = self.style_mut();
        style.color = Some(color.to_hex_string());
        style.opacity = Some(color.alpha());
        self
    }

    /// # Errors
    ///
    /// Returns `Opacity` if `opacity` is outside `[0, 1]`.
    fn set_opacity(&mut self, opacity: f64) -> Result<&mut Self, ValidationError> {
        self.style_mut().opacity = Some(check_unit("opacity", opacity)?);
        Ok(self)
    }

    /// True when nothing besides `id` would be serialized.
    fn is_empty(&self) -> bool;
}

// =============================================================================
// POINT
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PointEditor {
    id: String,
    style: StyleFields,
    marker: Option<String>,
}

impl PointEditor {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), style: StyleFields::default(), marker: None }
    }

    /// Marker image: a URL or an inline `data:image/svg+xml,<svg>...</svg>` URI.
    pub fn set_marker(&mut self, marker: impl Into<String>) -> &mut Self {
        self.marker = Some(marker.into());
        self
    }
}

impl StyleEditor for PointEditor {
    fn id(&self) -> &str {
        &self.id
    }

    fn style(&self) -> &StyleFields {
        &self.style
    }

    fn style_mut(&mut self) -> &mut StyleFields {
        &mut self.style
    }

    fn is_empty(&self) -> bool {
        self.style == StyleFields::default() && self.marker.is_none()
    }
}

impl Serialize for PointEditor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.style.write(&mut map, &self.id)?;
        entry(&mut map, "marker", self.marker.as_ref())?;
        map.end()
    }
}

// =============================================================================
// LINE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LineEditor {
    id: String,
    style: StyleFields,
    width: Option<u32>,
}

impl LineEditor {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), style: StyleFields::default(), width: None }
    }

    /// # Errors
    ///
    /// Returns `Width` if `width` is 0.
    pub fn set_width(&mut self, width: u32) -> Result<&mut Self, ValidationError> {
        self.width = Some(check_width("line width", width)?);
        Ok(self)
    }
}

impl StyleEditor for LineEditor {
    fn id(&self) -> &str {
        &self.id
    }

    fn style(&self) -> &StyleFields {
        &self.style
    }

    fn style_mut(&mut self) -> &mut StyleFields {
        &mut self.style
    }

    fn is_empty(&self) -> bool {
        self.style == StyleFields::default() && self.width.is_none()
    }
}

impl Serialize for LineEditor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.style.write(&mut map, &self.id)?;
        entry(&mut map, "width", self.width.as_ref())?;
        map.end()
    }
}

// =============================================================================
// POLYGON
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonEditor {
    id: String,
    style: StyleFields,
    has_fill: Option<bool>,
    has_outline: Option<bool>,
    outline_color: Option<String>,
    outline_opacity: Option<f64>,
    height: Option<f64>,
    width: Option<u32>,
}

impl PolygonEditor {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            style: StyleFields::default(),
            has_fill: None,
            has_outline: None,
            outline_color: None,
            outline_opacity: None,
            height: None,
            width: None,
        }
    }

    pub fn set_has_fill(&mut self, has_fill: bool) -> &mut Self {
        self.has_fill = Some(has_fill);
        self
    }

    pub fn set_has_outline(&mut self, has_outline: bool) -> &mut Self {
        self.has_outline = Some(has_outline);
        self
    }

    /// Writes `outlineColor` (hex) and `outlineOpacity` (alpha).
    pub fn set_outline_color(&mut self, color: &Color) -> &mut Self {
        self.outline_color = Some(color.to_hex_string());
        self.outline_opacity = Some(color.alpha());
        self
    }

    /// # Errors
    ///
    /// Returns `Opacity` if `opacity` is outside `[0, 1]`.
    pub fn set_outline_opacity(&mut self, opacity: f64) -> Result<&mut Self, ValidationError> {
        self.outline_opacity = Some(check_unit("outline opacity", opacity)?);
        Ok(self)
    }

    /// Extrusion height in meters; `0` keeps the polygon flat.
    ///
    /// # Errors
    ///
    /// Returns `Height` if `height` is negative or NaN.
    pub fn set_height(&mut self, height: f64) -> Result<&mut Self, ValidationError> {
        if height.is_nan() || height < 0.0 {
            return Err(ValidationError::Height(height));
        }
        self.height = Some(height);
        Ok(self)
    }

    /// Outline width.
    ///
    /// # Errors
    ///
    /// Returns `Width` if `width` is 0.
    pub fn set_width(&mut self, width: u32) -> Result<&mut Self, ValidationError> {
        self.width = Some(check_width("outline width", width)?);
        Ok(self)
    }
}

impl StyleEditor for PolygonEditor {
    fn id(&self) -> &str {
        &self.id
    }

    fn style(&self) -> &StyleFields {
        &self.style
    }

    fn style_mut(&mut self) -> &mut StyleFields {
        &mut self.style
    }

    fn is_empty(&self) -> bool {
        self.style == StyleFields::default()
            && self.has_fill.is_none()
            && self.has_outline.is_none()
            && self.outline_color.is_none()
            && self.outline_opacity.is_none()
            && self.height.is_none()
            && self.width.is_none()
    }
}

impl Serialize for PolygonEditor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.style.write(&mut map, &self.id)?;
        entry(&mut map, "hasFill", self.has_fill.as_ref())?;
        entry(&mut map, "hasOutline", self.has_outline.as_ref())?;
        entry(&mut map, "outlineColor", self.outline_color.as_ref())?;
        entry(&mut map, "outlineOpacity", self.outline_opacity.as_ref())?;
        entry(&mut map, "height", self.height.as_ref())?;
        entry(&mut map, "width", self.width.as_ref())?;
        map.end()
    }
}

fn check_width(field: &'static str, width: u32) -> Result<u32, ValidationError> {
    if width == 0 {
        return Err(ValidationError::Width { field, value: 0 });
    }
    Ok(width)
}

// =============================================================================
// EDITOR
// =============================================================================

/// An editor for any entity variant, as collected by a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Editor {
    Point(PointEditor),
    Line(LineEditor),
    Polygon(PolygonEditor),
}

impl Editor {
    #[must_use]
    pub fn as_point_mut(&mut self) -> Option<&mut PointEditor> {
        match self {
            Self::Point(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_line_mut(&mut self) -> Option<&mut LineEditor> {
        match self {
            Self::Line(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_polygon_mut(&mut self) -> Option<&mut PolygonEditor> {
        match self {
            Self::Polygon(e) => Some(e),
            _ => None,
        }
    }
}

impl StyleEditor for Editor {
    fn id(&self) -> &str {
        match self {
            Self::Point(e) => e.id(),
            Self::Line(e) => e.id(),
            Self::Polygon(e) => e.id(),
        }
    }

    fn style(&self) -> &StyleFields {
        match self {
            Self::Point(e) => e.style(),
            Self::Line(e) => e.style(),
            Self::Polygon(e) => e.style(),
        }
    }

    fn style_mut(&mut self) -> &mut StyleFields {
        match self {
            Self::Point(e) => e.style_mut(),
            Self::Line(e) => e.style_mut(),
            Self::Polygon(e) => e.style_mut(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Point(e) => e.is_empty(),
            Self::Line(e) => e.is_empty(),
            Self::Polygon(e) => e.is_empty(),
        }
    }
}

impl Serialize for Editor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Point(e) => e.serialize(serializer),
            Self::Line(e) => e.serialize(serializer),
            Self::Polygon(e) => e.serialize(serializer),
        }
    }
}

impl From<PointEditor> for Editor {
    fn from(editor: PointEditor) -> Self {
        Self::Point(editor)
    }
}

impl From<LineEditor> for Editor {
    fn from(editor: LineEditor) -> Self {
        Self::Line(editor)
    }
}

impl From<PolygonEditor> for Editor {
    fn from(editor: PolygonEditor) -> Self {
        Self::Polygon(editor)
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
