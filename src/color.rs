//! Structural RGB color key.
//!
//! Label legends describe category colors as `#rrggbb` strings. Inside the
//! converter colors are compared, hashed and ordered as byte triples so that
//! `#FFFFFF` and `#ffffff` are the same key and sorting is well defined.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConvertError;

/// An 8-bit RGB color, ordered lexicographically by (r, g, b).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// White, the default background of segmentation label images.
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    #[inline]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parses `#rrggbb` (the `#` is optional, digits are case-insensitive).
    pub fn from_hex(value: &str) -> Result<Self, ConvertError> {
        let invalid = || ConvertError::InvalidColor {
            value: value.to_string(),
        };

        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut channels = [0u8; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(channels))
    }

    #[inline]
    pub fn channels(&self) -> [u8; 3] {
        self.0
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(pixel: image::Rgb<u8>) -> Self {
        Self(pixel.0)
    }
}

impl FromStr for Rgb {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb({})", self)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Rgb::from_hex(&value).map_err(serde::de::Error::custom)
    }
}
