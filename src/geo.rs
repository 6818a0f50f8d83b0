//! Geographic value types: a point on the globe and an axis-aligned extent.
//!
//! Both types are immutable and compare componentwise. Wire form matches the
//! renderer: `{"lon", "lat", "alt"}` and `{"northWest", "southEast"}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const LON_RANGE: (f64, f64) = (-180.0, 180.0);
const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

// =============================================================================
// COORDINATES
// =============================================================================

/// A location in degrees, with altitude in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    lon: f64,
    lat: f64,
    alt: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    lon: f64,
    lat: f64,
    #[serde(default)]
    alt: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = ValidationError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::with_alt(raw.lon, raw.lat, raw.alt)
    }
}

impl Coordinates {
    /// Ground-level coordinates (`alt = 0`).
    ///
    /// # Errors
    ///
    /// Returns `Coordinate` if `lon` or `lat` is out of range.
    pub fn new(lon: f64, lat: f64) -> Result<Self, ValidationError> {
        Self::with_alt(lon, lat, 0.0)
    }

    /// # Errors
    ///
    /// Returns `Coordinate` if `lon` or `lat` is out of range.
    pub fn with_alt(lon: f64, lat: f64, alt: f64) -> Result<Self, ValidationError> {
        check_range("lon", lon, LON_RANGE)?;
        check_range("lat", lat, LAT_RANGE)?;
        Ok(Self { lon, lat, alt })
    }

    #[must_use]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn alt(&self) -> f64 {
        self.alt
    }

    /// Distance in meters to `other`.
    #[must_use]
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        // TODO: geodesic distance (Vincenty on WGS84); measurements are done by the renderer for now.
        let _ = other;
        0.0
    }

    /// Bearing in degrees from this point to `other`.
    #[must_use]
    pub fn azimuth_to(&self, other: &Coordinates) -> f64 {
        let _ = other;
        0.0
    }
}

/// Distance in meters between two coordinates.
#[must_use]
pub fn distance_between(from: &Coordinates, to: &Coordinates) -> f64 {
    from.distance_to(to)
}

/// Sum of the distances between consecutive points.
#[must_use]
pub fn path_length(path: &[Coordinates]) -> f64 {
    path.windows(2).map(|pair| distance_between(&pair[0], &pair[1])).sum()
}

fn check_range(axis: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::Coordinate { axis, value, min, max })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinates({}, {}, {})", self.lon, self.lat, self.alt)
    }
}

// =============================================================================
// RECTANGLE
// =============================================================================

/// An extent bounded by its north-west and south-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    north_west: Coordinates,
    south_east: Coordinates,
}

impl Rectangle {
    #[must_use]
    pub fn new(north_west: Coordinates, south_east: Coordinates) -> Self {
        Self { north_west, south_east }
    }

    /// Build from edge scalars in degrees.
    ///
    /// # Errors
    ///
    /// Returns `Coordinate` if any edge is out of range.
    pub fn from_bounds(north: f64, west: f64, south: f64, east: f64) -> Result<Self, ValidationError> {
        Ok(Self { north_west: Coordinates::new(west, north)?, south_east: Coordinates::new(east, south)? })
    }

    #[must_use]
    pub fn north_west(&self) -> Coordinates {
        self.north_west
    }

    #[must_use]
    pub fn south_east(&self) -> Coordinates {
        self.south_east
    }

    #[must_use]
    pub fn north(&self) -> f64 {
        self.north_west.lat
    }

    #[must_use]
    pub fn west(&self) -> f64 {
        self.north_west.lon
    }

    #[must_use]
    pub fn south(&self) -> f64 {
        self.south_east.lat
    }

    #[must_use]
    pub fn east(&self) -> f64 {
        self.south_east.lon
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rectangle({}, {})", self.north_west, self.south_east)
    }
}

#[cfg(test)]
#[path = "geo_test.rs"]
mod tests;
