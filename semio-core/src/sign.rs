/// Attribute vocabulary of a semiotic sign.
///
/// A sign carries three intensities (one per attractor) and two categorical
/// classifications. The sign type picks the offset plane; the sign logic
/// picks the shape class a render surface draws.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::transform::Orientation;

/// Upper bound of every intensity.
pub const MAX_INTENSITY: u8 = 100;

/// Identifies one of the three attractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKey {
    Icon,
    Index,
    Symbol,
}

impl AnchorKey {
    pub const ALL: [AnchorKey; 3] = [AnchorKey::Icon, AnchorKey::Index, AnchorKey::Symbol];

    pub fn label(self) -> &'static str {
        match self {
            AnchorKey::Icon => "Icon",
            AnchorKey::Index => "Index",
            AnchorKey::Symbol => "Symbol",
        }
    }
}

impl FromStr for AnchorKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icon" | "icono" => Ok(AnchorKey::Icon),
            "index" | "indice" => Ok(AnchorKey::Index),
            "symbol" | "simbolo" => Ok(AnchorKey::Symbol),
            other => Err(format!("unknown attractor `{other}`; expected icon|index|symbol")),
        }
    }
}

/// Three intensities in `0..=100`, one per attractor.
///
/// Values are clamped on the way in, so an `Intensities` never holds a value
/// above [`MAX_INTENSITY`]. They are not required to sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intensities {
    icon: u8,
    index: u8,
    symbol: u8,
}

impl Intensities {
    pub fn new(icon: u32, index: u32, symbol: u32) -> Self {
        Self {
            icon: clamp_intensity(icon),
            index: clamp_intensity(index),
            symbol: clamp_intensity(symbol),
        }
    }

    pub fn icon(&self) -> u8 {
        self.icon
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn symbol(&self) -> u8 {
        self.symbol
    }

    pub fn get(&self, key: AnchorKey) -> u8 {
        match key {
            AnchorKey::Icon => self.icon,
            AnchorKey::Index => self.index,
            AnchorKey::Symbol => self.symbol,
        }
    }

    pub fn set(&mut self, key: AnchorKey, value: u32) {
        let value = clamp_intensity(value);
        match key {
            AnchorKey::Icon => self.icon = value,
            AnchorKey::Index => self.index = value,
            AnchorKey::Symbol => self.symbol = value,
        }
    }

    pub fn sum(&self) -> u32 {
        self.icon as u32 + self.index as u32 + self.symbol as u32
    }
}

fn clamp_intensity(value: u32) -> u8 {
    value.min(MAX_INTENSITY as u32) as u8
}

/// Categorical axis that selects the offset plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignType {
    Qualisign,
    #[default]
    Sinsign,
    Legisign,
}

impl SignType {
    pub const ALL: [SignType; 3] = [SignType::Qualisign, SignType::Sinsign, SignType::Legisign];

    /// Next variant in declaration order, wrapping around
    pub fn next(self) -> Self {
        match self {
            SignType::Qualisign => SignType::Sinsign,
            SignType::Sinsign => SignType::Legisign,
            SignType::Legisign => SignType::Qualisign,
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignType::Qualisign => "Qualisign",
            SignType::Sinsign => "Sinsign",
            SignType::Legisign => "Legisign",
        };
        f.write_str(name)
    }
}

impl FromStr for SignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qualisign" => Ok(SignType::Qualisign),
            "sinsign" => Ok(SignType::Sinsign),
            "legisign" => Ok(SignType::Legisign),
            other => Err(format!(
                "unknown sign type `{other}`; expected qualisign|sinsign|legisign"
            )),
        }
    }
}

/// Categorical axis that selects the displayed shape class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignLogic {
    #[default]
    Rheme,
    Dicent,
    Argument,
}

impl SignLogic {
    pub const ALL: [SignLogic; 3] = [SignLogic::Rheme, SignLogic::Dicent, SignLogic::Argument];

    pub fn next(self) -> Self {
        match self {
            SignLogic::Rheme => SignLogic::Dicent,
            SignLogic::Dicent => SignLogic::Argument,
            SignLogic::Argument => SignLogic::Rheme,
        }
    }

    pub fn shape_class(self) -> ShapeClass {
        match self {
            SignLogic::Rheme => ShapeClass::Sphere,
            SignLogic::Dicent => ShapeClass::Cone,
            SignLogic::Argument => ShapeClass::Octahedron,
        }
    }
}

impl fmt::Display for SignLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignLogic::Rheme => "Rheme",
            SignLogic::Dicent => "Dicent",
            SignLogic::Argument => "Argument",
        };
        f.write_str(name)
    }
}

impl FromStr for SignLogic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rheme" => Ok(SignLogic::Rheme),
            "dicent" => Ok(SignLogic::Dicent),
            "argument" => Ok(SignLogic::Argument),
            other => Err(format!(
                "unknown sign logic `{other}`; expected rheme|dicent|argument"
            )),
        }
    }
}

/// Geometry family a render surface uses for a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeClass {
    Sphere,
    /// Drawn pointing up the base plane's Y axis.
    Cone,
    Octahedron,
}

impl ShapeClass {
    /// Fixed orientation applied to the shape's mesh
    pub fn orientation(self) -> Orientation {
        match self {
            ShapeClass::Cone => Orientation::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            ShapeClass::Sphere | ShapeClass::Octahedron => Orientation::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensities_clamp() {
        let values = Intensities::new(250, 100, 0);
        assert_eq!(values.icon(), 100);
        assert_eq!(values.index(), 100);
        assert_eq!(values.symbol(), 0);
        assert_eq!(values.sum(), 200);
    }

    #[test]
    fn test_intensities_set_by_key() {
        let mut values = Intensities::default();
        values.set(AnchorKey::Symbol, 42);
        values.set(AnchorKey::Icon, 1000);
        assert_eq!(values.get(AnchorKey::Symbol), 42);
        assert_eq!(values.get(AnchorKey::Icon), 100);
    }

    #[test]
    fn test_parse_categories() {
        assert_eq!("Legisign".parse::<SignType>().unwrap(), SignType::Legisign);
        assert_eq!(" dicent ".parse::<SignLogic>().unwrap(), SignLogic::Dicent);
        assert_eq!("icono".parse::<AnchorKey>().unwrap(), AnchorKey::Icon);
        assert!("tertiary".parse::<SignType>().is_err());
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(SignType::Legisign.next(), SignType::Qualisign);
        assert_eq!(SignLogic::Argument.next(), SignLogic::Rheme);
    }

    #[test]
    fn test_shape_lookup() {
        assert_eq!(SignLogic::Rheme.shape_class(), ShapeClass::Sphere);
        assert_eq!(SignLogic::Dicent.shape_class(), ShapeClass::Cone);
        assert_eq!(SignLogic::Argument.shape_class(), ShapeClass::Octahedron);
        assert!((ShapeClass::Cone.orientation().x + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
