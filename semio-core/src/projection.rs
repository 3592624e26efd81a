/// Projection from sign attributes to a position, a color and a shape.
///
/// Intensities are normalized into barycentric weights over the three
/// attractors. The same weights interpolate both the base-plane position and
/// the display color; the sign type only contributes the plane offset.
///
/// An all-zero intensity triple keeps its raw weights `(0, 0, 0)` instead of
/// dividing by zero. Such a sign sits at the base-plane origin (the centroid
/// of the attractor triangle) on its offset plane, and its color is black.
use nalgebra::Point3;
use serde::Serialize;

use crate::anchor::AnchorSet;
use crate::color::Rgb;
use crate::config::ProjectionConfig;
use crate::sign::{AnchorKey, Intensities, ShapeClass, SignLogic, SignType};
use crate::transform::Orientation;

/// Barycentric weights over Icon, Index and Symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub icon: f32,
    pub index: f32,
    pub symbol: f32,
}

impl Weights {
    pub fn from_intensities(values: &Intensities) -> Self {
        let sum = match values.sum() {
            0 => 1.0,
            sum => sum as f32,
        };
        Self {
            icon: values.icon() as f32 / sum,
            index: values.index() as f32 / sum,
            symbol: values.symbol() as f32 / sum,
        }
    }

    pub fn get(&self, key: AnchorKey) -> f32 {
        match key {
            AnchorKey::Icon => self.icon,
            AnchorKey::Index => self.index,
            AnchorKey::Symbol => self.symbol,
        }
    }

    pub fn sum(&self) -> f32 {
        self.icon + self.index + self.symbol
    }
}

/// Everything a render surface needs to draw one sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Appearance {
    pub position: Point3<f32>,
    pub color: Rgb,
    pub shape: ShapeClass,
    pub orientation: Orientation,
}

/// Stateless projection engine bound to one anchor set.
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    anchors: AnchorSet,
    intensity_boost: f32,
}

impl Projector {
    pub fn new(anchors: AnchorSet, intensity_boost: f32) -> Self {
        Self {
            anchors,
            intensity_boost,
        }
    }

    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self::new(AnchorSet::from_config(config), config.intensity_boost)
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    pub fn intensity_boost(&self) -> f32 {
        self.intensity_boost
    }

    /// World position of a sign
    pub fn position(&self, values: &Intensities, sign_type: SignType) -> Point3<f32> {
        let weights = Weights::from_intensities(values);
        let (mut x, mut y) = (0.0, 0.0);
        for attractor in self.anchors.iter() {
            let w = weights.get(attractor.key);
            x += attractor.position.x * w;
            y += attractor.position.y * w;
        }
        Point3::new(x, y, self.anchors.offset(sign_type))
    }

    /// Display color of a sign, clamped per channel
    pub fn color(&self, values: &Intensities) -> Rgb {
        let weights = Weights::from_intensities(values);
        self.anchors
            .iter()
            .fold(Rgb::BLACK, |acc, attractor| {
                acc + attractor.color.scale(weights.get(attractor.key))
            })
            .scale(self.intensity_boost)
            .clamped()
    }

    pub fn appearance(&self, values: &Intensities, sign_type: SignType, logic: SignLogic) -> Appearance {
        let shape = logic.shape_class();
        Appearance {
            position: self.position(values, sign_type),
            color: self.color(values),
            shape,
            orientation: shape.orientation(),
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::from_config(&ProjectionConfig::default())
    }
}
