pub mod flat;
pub mod gouraud;
pub mod normal_map;
pub mod phong;
pub mod shadow;

use nalgebra::Vector3;
use serde::Deserialize;

/// Lighting models selectable from the command line and the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ShaderKind {
    /// Fixed color per face.
    Flat,
    /// Per-vertex diffuse intensity.
    Gouraud,
    /// Gouraud intensity quantized into bands.
    Toon,
    /// Gouraud intensity times the diffuse map.
    TexturedGouraud,
    /// Object-space normal map.
    NormalMap,
    /// Per-pixel diffuse and specular.
    Phong,
    /// Tangent-space normal map through the Darboux frame.
    TangentSpace,
    /// Screen depth as gray.
    Depth,
    /// Two-pass shadow mapping with Phong lighting.
    Shadow,
}

/// Diffuse term, never negative.
#[inline]
pub(crate) fn lambert(n: &Vector3<f32>, l: &Vector3<f32>) -> f32 {
    n.dot(l).max(0.0)
}

/// Mirror of `l` about `n` (both unit length).
#[inline]
pub(crate) fn reflect(n: &Vector3<f32>, l: &Vector3<f32>) -> Vector3<f32> {
    (n * (2.0 * n.dot(l)) - l).normalize()
}

/// Specular term: the view looks down -z in shading space, so the
/// reflection's z component is the view cosine.
#[inline]
pub(crate) fn phong_specular(r: &Vector3<f32>, exponent: f32) -> f32 {
    r.z.max(0.0).powf(exponent)
}
