//! Color names and raw color codes.
//!
//! A [`ColorSpec`] is either one of the symbolic [`ColorName`]s understood
//! by every backend, or a raw platform-specific code. Each backend resolves
//! names through its own foreground/background tables; raw codes are handed
//! to the backend as-is.
//!
//! Raw codes are not portable. The ANSI backend writes them verbatim inside
//! an SGR sequence (so `"1;31"` works there), while the native console
//! backend parses them as attribute numbers and rejects anything outside its
//! valid range.
//!
//! # Example
//!
//! ```rust
//! use color_console::{ColorName, ColorSpec};
//!
//! assert_eq!(ColorSpec::from("dark_gray"), ColorSpec::Named(ColorName::DarkGray));
//! assert_eq!(ColorSpec::from("1;31"), ColorSpec::Raw("1;31".into()));
//! assert_eq!(ColorSpec::from(10u16), ColorSpec::Raw("10".into()));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Symbolic color names shared by all backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorName {
    Black,
    Blue,
    DarkBlue,
    LightBlue,
    Cyan,
    Green,
    DarkGreen,
    LightGreen,
    Red,
    DarkRed,
    LightRed,
    Magenta,
    DarkMagenta,
    LightMagenta,
    Yellow,
    Gray,
    DarkGray,
    LightGray,
    White,
}

impl ColorName {
    /// Every name, in table order.
    pub const ALL: [ColorName; 19] = [
        ColorName::Black,
        ColorName::Blue,
        ColorName::DarkBlue,
        ColorName::LightBlue,
        ColorName::Cyan,
        ColorName::Green,
        ColorName::DarkGreen,
        ColorName::LightGreen,
        ColorName::Red,
        ColorName::DarkRed,
        ColorName::LightRed,
        ColorName::Magenta,
        ColorName::DarkMagenta,
        ColorName::LightMagenta,
        ColorName::Yellow,
        ColorName::Gray,
        ColorName::DarkGray,
        ColorName::LightGray,
        ColorName::White,
    ];

    /// The snake_case name used in configuration and on the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Black => "black",
            ColorName::Blue => "blue",
            ColorName::DarkBlue => "dark_blue",
            ColorName::LightBlue => "light_blue",
            ColorName::Cyan => "cyan",
            ColorName::Green => "green",
            ColorName::DarkGreen => "dark_green",
            ColorName::LightGreen => "light_green",
            ColorName::Red => "red",
            ColorName::DarkRed => "dark_red",
            ColorName::LightRed => "light_red",
            ColorName::Magenta => "magenta",
            ColorName::DarkMagenta => "dark_magenta",
            ColorName::LightMagenta => "light_magenta",
            ColorName::Yellow => "yellow",
            ColorName::Gray => "gray",
            ColorName::DarkGray => "dark_gray",
            ColorName::LightGray => "light_gray",
            ColorName::White => "white",
        }
    }
}

impl FromStr for ColorName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ColorName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A color as requested by the caller.
///
/// Conversions from strings never fail: unrecognised names become
/// [`ColorSpec::Raw`] and are validated (or not) by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "ColorValue")]
pub enum ColorSpec {
    /// A symbolic name resolved through the backend's tables.
    Named(ColorName),
    /// A platform-specific code passed through to the backend.
    Raw(String),
}

impl ColorSpec {
    /// Shorthand for the default status and table color.
    pub const CYAN: ColorSpec = ColorSpec::Named(ColorName::Cyan);

    /// Returns the symbolic name, if this is not a raw code.
    pub fn name(&self) -> Option<ColorName> {
        match self {
            ColorSpec::Named(name) => Some(*name),
            ColorSpec::Raw(_) => None,
        }
    }
}

impl From<ColorName> for ColorSpec {
    fn from(name: ColorName) -> Self {
        ColorSpec::Named(name)
    }
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        match s.parse::<ColorName>() {
            Ok(name) => ColorSpec::Named(name),
            Err(()) => ColorSpec::Raw(s.to_string()),
        }
    }
}

impl From<String> for ColorSpec {
    fn from(s: String) -> Self {
        ColorSpec::from(s.as_str())
    }
}

impl From<u16> for ColorSpec {
    fn from(code: u16) -> Self {
        ColorSpec::Raw(code.to_string())
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpec::Named(name) => name.fmt(f),
            ColorSpec::Raw(code) => f.write_str(code),
        }
    }
}

/// Serialized shape of a color: a name/opaque string or a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Text(String),
    Code(u64),
}

impl From<ColorValue> for ColorSpec {
    fn from(value: ColorValue) -> Self {
        match value {
            ColorValue::Text(s) => ColorSpec::from(s),
            ColorValue::Code(n) => ColorSpec::Raw(n.to_string()),
        }
    }
}
