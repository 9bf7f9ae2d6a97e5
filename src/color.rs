//! Deterministic tag colours.
//!
//! Colours come from a 32-bit FNV-1a hash of the tag's UTF-8 bytes, so a
//! tag keeps its colour across runs, platforms and releases. Distinct tags
//! may collide.

use serde::{Deserialize, Serialize};
use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    pub fn to_u24(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

pub fn color_for(tag: &str) -> Rgb {
    Rgb::from_u24(fnv1a_32(tag.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(fnv1a_32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn color_uses_low_24_bits() {
        assert_eq!(color_for("a").hex(), "#0c292c");
        assert_eq!(color_for("a").to_u24(), 0x0c_292c);
    }

    #[test]
    fn same_tag_same_color() {
        assert_eq!(color_for("Reels"), color_for("Reels"));
        assert_eq!(color_for("Notícia"), color_for("Notícia"));
    }

    #[test]
    fn case_matters() {
        assert_ne!(fnv1a_32(b"Reels"), fnv1a_32(b"reels"));
    }

    #[test]
    fn display_matches_hex() {
        let rgb = Rgb::from_u24(0x00ff_10);
        assert_eq!(rgb.to_string(), "#00ff10");
    }
}
