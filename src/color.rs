//! RGBA color with validated channels and CSS hex conversion.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// An sRGB color: integer channels in `[0, 255]` and alpha in `[0, 1]`.
///
/// Every constructor validates its input; a `Color` value always satisfies
/// its ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: f64,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba_const(0, 0, 0, 0.0);
    pub const BLACK: Color = Color::rgba_const(0, 0, 0, 1.0);
    pub const WHITE: Color = Color::rgba_const(255, 255, 255, 1.0);
    pub const RED: Color = Color::rgba_const(255, 0, 0, 1.0);
    pub const GREEN: Color = Color::rgba_const(0, 255, 0, 1.0);
    pub const BLUE: Color = Color::rgba_const(0, 0, 255, 1.0);
    pub const CYAN: Color = Color::rgba_const(0, 255, 255, 1.0);
    pub const GRAY: Color = Color::rgba_const(128, 128, 128, 1.0);
    pub const MAGENTA: Color = Color::rgba_const(255, 0, 255, 1.0);
    pub const YELLOW: Color = Color::rgba_const(255, 255, 0, 1.0);

    const fn rgba_const(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self { red, green, blue, alpha }
    }

    /// # Errors
    ///
    /// Returns `ColorChannel` for a channel outside `[0, 255]` and `Opacity`
    /// for an alpha outside `[0, 1]`.
    pub fn new(red: i32, green: i32, blue: i32, alpha: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            red: check_channel("red", red)?,
            green: check_channel("green", green)?,
            blue: check_channel("blue", blue)?,
            alpha: check_alpha(alpha)?,
        })
    }

    /// Parse `#RGB` or `#RRGGBB` (hex digits in either case).
    ///
    /// # Errors
    ///
    /// Returns `ColorString` for a malformed string and `Opacity` for an
    /// alpha outside `[0, 1]`.
    pub fn from_hex_string(hex: &str, alpha: f64) -> Result<Self, ValidationError> {
        let alpha = check_alpha(alpha)?;
        let invalid = || ValidationError::ColorString(hex.to_owned());

        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let parse = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        let (red, green, blue) = match digits.len() {
            6 => (parse(&digits[0..2])?, parse(&digits[2..4])?, parse(&digits[4..6])?),
            3 => {
                let double = |i: usize| parse(&digits[i..=i].repeat(2));
                (double(0)?, double(1)?, double(2)?)
            }
            _ => return Err(invalid()),
        };

        Ok(Self { red, green, blue, alpha })
    }

    #[must_use]
    pub fn red(&self) -> u8 {
        self.red
    }

    #[must_use]
    pub fn green(&self) -> u8 {
        self.green
    }

    #[must_use]
    pub fn blue(&self) -> u8 {
        self.blue
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// # Errors
    ///
    /// Returns `ColorChannel` if `red` is outside `[0, 255]`.
    pub fn with_red(self, red: i32) -> Result<Self, ValidationError> {
        Ok(Self { red: check_channel("red", red)?, ..self })
    }

    /// # Errors
    ///
    /// Returns `ColorChannel` if `green` is outside `[0, 255]`.
    pub fn with_green(self, green: i32) -> Result<Self, ValidationError> {
        Ok(Self { green: check_channel("green", green)?, ..self })
    }

    /// # Errors
    ///
    /// Returns `ColorChannel` if `blue` is outside `[0, 255]`.
    pub fn with_blue(self, blue: i32) -> Result<Self, ValidationError> {
        Ok(Self { blue: check_channel("blue", blue)?, ..self })
    }

    /// # Errors
    ///
    /// Returns `Opacity` if `alpha` is outside `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Result<Self, ValidationError> {
        Ok(Self { alpha: check_alpha(alpha)?, ..self })
    }

    /// Canonical CSS form, e.g. `#ea3603`. Alpha is not included.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Parses a CSS hex string as an opaque color.
impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex_string(s, 1.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.to_hex_string(), self.alpha)
    }
}

fn check_channel(channel: &'static str, value: i32) -> Result<u8, ValidationError> {
    u8::try_from(value).map_err(|_| ValidationError::ColorChannel { channel, value })
}

pub(crate) fn check_alpha(alpha: f64) -> Result<f64, ValidationError> {
    check_unit("opacity", alpha)
}

/// Accept values in `[0, 1]`; NaN is rejected.
pub(crate) fn check_unit(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::Opacity { field, value })
    }
}

#[cfg(test)]
#[path = "color_test.rs"]
mod tests;
