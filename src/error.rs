//! Error taxonomy shared by the data model and the bridge.
//!
//! DESIGN
//! ======
//! Two families matter to callers:
//! - `ValidationError` is raised synchronously while building a value
//!   (colors, editors, descriptors). Values are never clamped.
//! - `DecodeError` comes from payloads produced by the renderer. The bridge
//!   logs it and drops the affected dispatch; it never reaches unrelated
//!   in-flight operations.
//!
//! Every error carries a grepable code through [`ErrorCode`] so log lines can
//! be filtered without parsing messages.

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code for structured log fields.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

// =============================================================================
// VALIDATION
// =============================================================================

/// A value failed its range or format check at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("color channel {channel} must be between 0 and 255, got {value}")]
    ColorChannel { channel: &'static str, value: i32 },
    #[error("{field} must be a value between 0 and 1, got {value}")]
    Opacity { field: &'static str, value: f64 },
    #[error("{0:?} is not a valid color string")]
    ColorString(String),
    #[error("{field} must be greater than 0, got {value}")]
    Width { field: &'static str, value: i64 },
    #[error("polygon height must be at least 0, got {0}")]
    Height(f64),
    #[error("{axis} {value} is out of range [{min}, {max}]")]
    Coordinate { axis: &'static str, value: f64, min: f64, max: f64 },
    #[error("either a GeoJSON document or a URL must be specified")]
    MissingSource,
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ColorChannel { .. } => "E_COLOR_CHANNEL",
            Self::Opacity { .. } => "E_OPACITY",
            Self::ColorString(_) => "E_COLOR_STRING",
            Self::Width { .. } => "E_WIDTH",
            Self::Height(_) => "E_HEIGHT",
            Self::Coordinate { .. } => "E_COORDINATE",
            Self::MissingSource => "E_MISSING_SOURCE",
        }
    }
}

// =============================================================================
// DECODE
// =============================================================================

/// A payload received from the renderer could not be turned into a typed value.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown event kind: {0}")]
    UnknownEvent(String),
    #[error("unknown touch action: {0}")]
    UnknownTouchAction(i64),
    #[error("missing payload for {0}")]
    MissingPayload(&'static str),
}

impl ErrorCode for DecodeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_DECODE_JSON",
            Self::UnknownEvent(_) => "E_UNKNOWN_EVENT",
            Self::UnknownTouchAction(_) => "E_UNKNOWN_TOUCH_ACTION",
            Self::MissingPayload(_) => "E_MISSING_PAYLOAD",
        }
    }
}

// =============================================================================
// BRIDGE
// =============================================================================

/// Errors returned synchronously by map-facing bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Strict mode only: the renderer has not signalled ready yet.
    #[error("map is not ready")]
    NotReady,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to encode command arguments: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ErrorCode for BridgeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady => "E_NOT_READY",
            Self::Validation(e) => e.error_code(),
            Self::Encode(_) => "E_ENCODE",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
