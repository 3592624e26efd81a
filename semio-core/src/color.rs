/// Linear RGB colors with channels in `0.0..=1.0`
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An RGB color. Channels are expected to be in `0.0..=1.0` once clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Clamp every channel into `0.0..=1.0`
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    /// Quantize to 8-bit channels
    pub fn to_u8(self) -> (u8, u8, u8) {
        let c = self.clamped();
        (
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        )
    }

    /// Packed `0xRRGGBB` value
    pub fn to_hex(self) -> u32 {
        let (r, g, b) = self.to_u8();
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }
}

impl std::ops::Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("expected a color like `#rrggbb`, got `{s}`"));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::from_hex)
            .map_err(|err| format!("invalid color `{s}`: {err}"))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Rgb::from_hex(0xef4444);
        assert_eq!(color.to_hex(), 0xef4444);
        assert_eq!(color.to_string(), "#ef4444");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("zzzzzz".parse::<Rgb>().is_err());
        assert_eq!("22c56e".parse::<Rgb>().unwrap(), Rgb::from_hex(0x22c56e));
    }

    #[test]
    fn test_clamp() {
        let c = Rgb::new(1.5, -0.2, 0.5).clamped();
        assert_eq!(c, Rgb::new(1.0, 0.0, 0.5));
    }
}
