use crate::scene::texture::Texture;
use nalgebra::{Vector2, Vector3};

/// Texture maps attached to a model. Every map is optional; lookups
/// fall back to neutral values when a map is missing.
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub diffuse: Option<Texture>,
    /// Object-space normal map.
    pub normal: Option<Texture>,
    /// Tangent-space normal map.
    pub tangent_normal: Option<Texture>,
    /// Specular exponent map (first channel).
    pub specular: Option<Texture>,
}

impl Material {
    /// Diffuse color in [0, 1]; white without a map.
    pub fn diffuse(&self, uv: Vector2<f32>) -> Vector3<f32> {
        self.diffuse
            .as_ref()
            .map_or_else(|| Vector3::repeat(1.0), |t| t.sample(uv))
    }

    /// Object-space normal decoded from rgb, `None` without a map.
    pub fn normal(&self, uv: Vector2<f32>) -> Option<Vector3<f32>> {
        self.normal.as_ref().map(|t| decode_normal(t.sample(uv)))
    }

    /// Tangent-space normal decoded from rgb, `None` without a map.
    pub fn tangent_normal(&self, uv: Vector2<f32>) -> Option<Vector3<f32>> {
        self.tangent_normal
            .as_ref()
            .map(|t| decode_normal(t.sample(uv)))
    }

    /// Specular exponent; 1 without a map.
    pub fn specular(&self, uv: Vector2<f32>) -> f32 {
        self.specular
            .as_ref()
            .map_or(1.0, |t| t.texel(uv)[0] as f32)
    }
}

/// [0, 1] rgb → [-1, 1] xyz.
#[inline]
fn decode_normal(rgb: Vector3<f32>) -> Vector3<f32> {
    rgb * 2.0 - Vector3::repeat(1.0)
}
