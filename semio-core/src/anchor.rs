/// Fixed attractor geometry shared by every sign
use nalgebra::Point3;

use crate::color::Rgb;
use crate::config::ProjectionConfig;
use crate::sign::{AnchorKey, SignType};

/// Placement angle of an attractor on the base circle, in degrees
pub fn anchor_angle(key: AnchorKey) -> f32 {
    match key {
        AnchorKey::Icon => 150.0,
        AnchorKey::Index => 30.0,
        AnchorKey::Symbol => 270.0,
    }
}

/// Point on the base plane (z = 0) at `degrees` around a circle of `radius`
pub fn anchor_position(radius: f32, degrees: f32) -> Point3<f32> {
    let theta = degrees.to_radians();
    Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
}

/// One of the three fixed anchors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attractor {
    pub key: AnchorKey,
    pub position: Point3<f32>,
    pub color: Rgb,
}

/// The three attractors plus the offset applied per sign type.
///
/// Built once from a [`ProjectionConfig`] and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSet {
    attractors: [Attractor; 3],
    offset_depth: f32,
}

impl AnchorSet {
    pub fn new(radius: f32, offset_depth: f32, colors: [Rgb; 3]) -> Self {
        let attractors = [0, 1, 2].map(|i| {
            let key = AnchorKey::ALL[i];
            Attractor {
                key,
                position: anchor_position(radius, anchor_angle(key)),
                color: colors[i],
            }
        });
        Self {
            attractors,
            offset_depth,
        }
    }

    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self::new(
            config.radius,
            config.offset_depth,
            [config.icon_color, config.index_color, config.symbol_color],
        )
    }

    pub fn get(&self, key: AnchorKey) -> &Attractor {
        match key {
            AnchorKey::Icon => &self.attractors[0],
            AnchorKey::Index => &self.attractors[1],
            AnchorKey::Symbol => &self.attractors[2],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attractor> {
        self.attractors.iter()
    }

    pub fn offset_depth(&self) -> f32 {
        self.offset_depth
    }

    /// Z offset of the plane a sign type lives on
    pub fn offset(&self, sign_type: SignType) -> f32 {
        match sign_type {
            SignType::Qualisign => -self.offset_depth,
            SignType::Sinsign => 0.0,
            SignType::Legisign => self.offset_depth,
        }
    }
}

impl Default for AnchorSet {
    fn default() -> Self {
        Self::from_config(&ProjectionConfig::default())
    }
}
