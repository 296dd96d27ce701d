use crate::scene::context::RenderContext;
use nalgebra::{Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy: cheaply duplicable values for per-vertex storage.
/// - Add + Mul<f32>: linear combination used by barycentric interpolation.
pub trait Interpolatable: Copy + Add<Output = Self> + Mul<f32, Output = Self> {
    fn zero() -> Self;
}

impl Interpolatable for f32 {
    fn zero() -> Self {
        0.0
    }
}

impl Interpolatable for Vector2<f32> {
    fn zero() -> Self {
        Vector2::zeros()
    }
}

impl Interpolatable for Vector3<f32> {
    fn zero() -> Self {
        Vector3::zeros()
    }
}

impl Interpolatable for Vector4<f32> {
    fn zero() -> Self {
        Vector4::zeros()
    }
}

/// Per-triangle varying storage: one column per vertex slot.
///
/// The vertex stage writes column `nth` once per triangle; the fragment stage
/// reads the blend of all three columns through barycentric weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Varying<T: Interpolatable> {
    columns: [T; 3],
}

impl<T: Interpolatable> Default for Varying<T> {
    fn default() -> Self {
        Self {
            columns: [T::zero(); 3],
        }
    }
}

impl<T: Interpolatable> Varying<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn set(&mut self, nth: usize, value: T) {
        self.columns[nth] = value;
    }

    #[inline(always)]
    pub fn get(&self, nth: usize) -> T {
        self.columns[nth]
    }

    /// Σ bar[i] · column[i].
    #[inline(always)]
    pub fn interpolate(&self, bar: Vector3<f32>) -> T {
        self.columns[0] * bar.x + self.columns[1] * bar.y + self.columns[2] * bar.z
    }
}

/// Shader represents the programmable stages of the pipeline.
///
/// A shader carries its own per-triangle state (varyings, uniforms) and reads
/// everything else from the render context of the running pass.
pub trait Shader {
    /// Vertex shader stage.
    ///
    /// Reads vertex `nth` (0..3) of face `face` from `ctx.model`, stores the
    /// varyings for column `nth` and returns the viewport-space homogeneous
    /// position (`ctx.transforms.combined() * embed(p, 1)`, or the shader's own
    /// matrix for light-space passes).
    ///
    /// Called exactly three times per triangle before that triangle is rasterized.
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32>;

    /// Fragment shader stage.
    ///
    /// `bar` are the barycentric weights of the pixel. Returns a linear RGB color
    /// (clamped to [0, 1] only when written), or `None` to discard the fragment:
    /// neither color nor depth is written then.
    fn fragment(&self, ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_reproduces_vertex_values() {
        let mut v: Varying<Vector3<f32>> = Varying::new();
        v.set(0, Vector3::new(1.0, 0.0, 0.0));
        v.set(1, Vector3::new(0.0, 2.0, 0.0));
        v.set(2, Vector3::new(0.0, 0.0, 3.0));

        assert_eq!(v.interpolate(Vector3::x()), v.get(0));
        assert_eq!(v.interpolate(Vector3::y()), v.get(1));
        assert_eq!(v.interpolate(Vector3::z()), v.get(2));
    }

    #[test]
    fn interpolation_is_linear_in_the_weights() {
        let mut v: Varying<f32> = Varying::new();
        v.set(0, 10.0);
        v.set(1, 20.0);
        v.set(2, 40.0);

        let bar = Vector3::new(0.5, 0.25, 0.25);
        assert!((v.interpolate(bar) - 20.0).abs() < 1e-6);

        let centroid = Vector3::repeat(1.0 / 3.0);
        assert!((v.interpolate(centroid) - 70.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn columns_are_overwritten_per_triangle() {
        let mut v: Varying<Vector2<f32>> = Varying::new();
        v.set(1, Vector2::new(0.3, 0.7));
        v.set(1, Vector2::new(0.9, 0.1));
        assert_eq!(v.get(1), Vector2::new(0.9, 0.1));
        assert_eq!(v.get(0), Vector2::zeros());
    }
}
