//! Layers loaded on the map and the descriptor used to request a load.
//!
//! DESIGN
//! ======
//! A layer is the unit of load/unload against the renderer. Layers are only
//! ever produced by decoding a load reply; callers describe what to load
//! with a `GeoJsonLayerDescriptor`, validated when built.

use serde::{Deserialize, Serialize};

use crate::color::{Color, check_unit};
use crate::entity::{DEFAULT_POINT_ICON, Entity};
use crate::error::{DecodeError, ValidationError};

// =============================================================================
// LAYER
// =============================================================================

/// A layer that has been loaded onto the map.
pub trait Layer {
    fn id(&self) -> &str;

    /// Entities owned by this layer. Empty for layers without vector content.
    fn entities(&self) -> &[Entity] {
        &[]
    }
}

/// A collection of entities loaded from one vector source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorLayer {
    id: String,
    entities: Vec<Entity>,
    #[serde(rename = "isVisible", default = "visible_by_default")]
    visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl VectorLayer {
    /// # Errors
    ///
    /// Returns `Json` for malformed input or any entity with an unsupported
    /// `type` tag.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }
}

impl Layer for VectorLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

impl<'a> IntoIterator for &'a VectorLayer {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

// =============================================================================
// GEOJSON DESCRIPTOR
// =============================================================================

const GEOJSON_LAYER_TYPE: &str = "GeoJSON";
const DEFAULT_LAYER_COLOR: &str = "#FFFFFF";
const DEFAULT_LAYER_OPACITY: f64 = 0.65;

/// Load request for a GeoJSON layer. Exactly one of `geoJson` and `url` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoJsonLayerDescriptor {
    #[serde(rename = "type")]
    layer_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    geo_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    color: String,
    outline_color: String,
    opacity: f64,
    outline_opacity: f64,
    point_icon: String,
    zoom: bool,
}

impl GeoJsonLayerDescriptor {
    #[must_use]
    pub fn builder() -> GeoJsonLayerBuilder {
        GeoJsonLayerBuilder::default()
    }

    #[must_use]
    pub fn geo_json(&self) -> Option<&str> {
        self.geo_json.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[must_use]
    pub fn should_focus(&self) -> bool {
        self.zoom
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Inline(String),
    Url(String),
}

/// Builder for [`GeoJsonLayerDescriptor`]. Ranges are checked in `build`.
#[derive(Debug, Clone)]
pub struct GeoJsonLayerBuilder {
    source: Option<Source>,
    color: String,
    outline_color: String,
    opacity: f64,
    outline_opacity: f64,
    point_icon: String,
    zoom: bool,
}

impl Default for GeoJsonLayerBuilder {
    fn default() -> Self {
        Self {
            source: None,
            color: DEFAULT_LAYER_COLOR.to_owned(),
            outline_color: DEFAULT_LAYER_COLOR.to_owned(),
            opacity: DEFAULT_LAYER_OPACITY,
            outline_opacity: DEFAULT_LAYER_OPACITY,
            point_icon: DEFAULT_POINT_ICON.to_owned(),
            zoom: false,
        }
    }
}

impl GeoJsonLayerBuilder {
    /// Serialized GeoJSON document as the layer source.
    #[must_use]
    pub fn from_geojson(geo_json: impl Into<String>) -> Self {
        Self { source: Some(Source::Inline(geo_json.into())), ..Self::default() }
    }

    /// GeoJSON value as the layer source; serialized inline.
    #[must_use]
    pub fn from_value(geo_json: &serde_json::Value) -> Self {
        Self::from_geojson(geo_json.to_string())
    }

    /// URL the renderer fetches the GeoJSON document from.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { source: Some(Source::Url(url.into())), ..Self::default() }
    }

    /// Fill color; also sets the fill opacity from the color's alpha.
    #[must_use]
    pub fn color(mut self, color: &Color) -> Self {
        self.color = color.to_hex_string();
        self.opacity = color.alpha();
        self
    }

    /// Outline color; also sets the outline opacity from the color's alpha.
    #[must_use]
    pub fn outline_color(mut self, color: &Color) -> Self {
        self.outline_color = color.to_hex_string();
        self.outline_opacity = color.alpha();
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn outline_opacity(mut self, opacity: f64) -> Self {
        self.outline_opacity = opacity;
        self
    }

    /// Icon for point features: a URL or an SVG data URI.
    #[must_use]
    pub fn point_icon(mut self, icon: impl Into<String>) -> Self {
        self.point_icon = icon.into();
        self
    }

    /// Move the camera to the layer once loaded.
    #[must_use]
    pub fn should_focus(mut self, focus: bool) -> Self {
        self.zoom = focus;
        self
    }

    /// # Errors
    ///
    /// Returns `MissingSource` without a GeoJSON document or URL, and
    /// `Opacity` if either opacity is outside `[0, 1]`.
    pub fn build(self) -> Result<GeoJsonLayerDescriptor, ValidationError> {
        let Some(source) = self.source else {
            return Err(ValidationError::MissingSource);
        };
        let opacity = check_unit("opacity", self.opacity)?;
        let outline_opacity = check_unit("outline opacity", self.outline_opacity)?;

        let (geo_json, url) = match source {
            Source::Inline(doc) => (Some(doc), None),
            Source::Url(url) => (None, Some(url)),
        };

        Ok(GeoJsonLayerDescriptor {
            layer_type: GEOJSON_LAYER_TYPE,
            geo_json,
            url,
            color: self.color,
            outline_color: self.outline_color,
            opacity,
            outline_opacity,
            point_icon: self.point_icon,
            zoom: self.zoom,
        })
    }
}

#[cfg(test)]
#[path = "layer_test.rs"]
mod tests;
