//! Entity metadata: an immutable bag of JSON values keyed by string.
//!
//! DESIGN
//! ======
//! Values are kept as `serde_json::Value` so nested objects and arrays survive
//! untouched. Typed getters follow one policy: an absent key yields the
//! type's default (`0.0`, `false`, `None`) and a present key of the wrong
//! shape is an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ErrorCode;

/// A present value did not have the requested shape.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("property {key:?} is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
    #[error("property {key:?} cannot be converted: {source}")]
    Conversion {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ErrorCode for PropertyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "E_PROPERTY_TYPE",
            Self::Conversion { .. } => "E_PROPERTY_CONVERSION",
        }
    }
}

/// Immutable key/value metadata attached to an entity.
///
/// Equality is deep and ignores key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    values: Map<String, Value>,
}

impl Properties {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Numeric value for `key`, or `0.0` when absent.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a number.
    pub fn get_f64(&self, key: &str) -> Result<f64, PropertyError> {
        match self.values.get(key) {
            None => Ok(0.0),
            Some(value) => value.as_f64().ok_or_else(|| mismatch(key, "number")),
        }
    }

    /// Boolean value for `key`, or `false` when absent.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool, PropertyError> {
        match self.values.get(key) {
            None => Ok(false),
            Some(value) => value.as_bool().ok_or_else(|| mismatch(key, "boolean")),
        }
    }

    /// String value for `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a string.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, PropertyError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| mismatch(key, "string")),
        }
    }

    /// Structurally convert the value for `key` into `T`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `Conversion` if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PropertyError> {
        let Some(value) = self.values.get(key) else {
            return Ok(None);
        };
        T::deserialize(value)
            .map(Some)
            .map_err(|source| PropertyError::Conversion { key: key.to_owned(), source })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

fn mismatch(key: &str, expected: &'static str) -> PropertyError {
    PropertyError::TypeMismatch { key: key.to_owned(), expected }
}

#[cfg(test)]
#[path = "properties_test.rs"]
mod tests;
