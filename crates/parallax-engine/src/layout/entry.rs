use serde::Deserialize;

use crate::derive::curves::LayerAnchor;

/// One image or message layer: `[assetRef, x, y, parallaxFactor, z, scale]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(String, f32, f32, f32, f32, f32)")]
pub struct LayoutEntry {
    pub asset: String,
    pub x: f32,
    pub y: f32,
    pub factor: f32,
    pub z: f32,
    pub scale: f32,
}

impl LayoutEntry {
    pub fn new(asset: impl Into<String>, x: f32, y: f32, factor: f32, z: f32, scale: f32) -> Self {
        Self {
            asset: asset.into(),
            x,
            y,
            factor,
            z,
            scale,
        }
    }

    #[inline]
    pub fn anchor(&self) -> LayerAnchor {
        LayerAnchor {
            x: self.x,
            y: self.y,
            factor: self.factor,
            z: self.z,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        [self.x, self.y, self.factor, self.z, self.scale]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl From<(String, f32, f32, f32, f32, f32)> for LayoutEntry {
    fn from((asset, x, y, factor, z, scale): (String, f32, f32, f32, f32, f32)) -> Self {
        Self {
            asset,
            x,
            y,
            factor,
            z,
            scale,
        }
    }
}
