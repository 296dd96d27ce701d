use crate::core::pipeline::{Shader, Varying};
use crate::pipeline::shaders::lambert;
use crate::scene::context::RenderContext;
use nalgebra::{Vector2, Vector3, Vector4};

/// Per-vertex light intensity, shared by the Gouraud family.
///
/// Normals and light are both taken in object space.
#[derive(Default)]
struct VertexIntensity {
    intensity: Varying<f32>,
}

impl VertexIntensity {
    fn store(&mut self, ctx: &RenderContext, face: usize, nth: usize) {
        let n = ctx.model.vertex_normal(face, nth).normalize();
        let l = ctx.light_dir.normalize();
        self.intensity.set(nth, lambert(&n, &l));
    }
}

/// Plain Gouraud shading: white scaled by the interpolated intensity.
#[derive(Default)]
pub struct GouraudShader {
    varying: VertexIntensity,
}

impl GouraudShader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Shader for GouraudShader {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        self.varying.store(ctx, face, nth);
        ctx.clip_position(face, nth)
    }

    fn fragment(&self, _ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>> {
        Some(Vector3::repeat(self.varying.intensity.interpolate(bar)))
    }
}

/// Gouraud intensity snapped to six bands, tinting a base color.
pub struct ToonShader {
    varying: VertexIntensity,
    base: Vector3<f32>,
}

impl Default for ToonShader {
    fn default() -> Self {
        Self::new(Vector3::new(255.0, 155.0, 0.0) / 255.0)
    }
}

impl ToonShader {
    pub fn new(base: Vector3<f32>) -> Self {
        Self {
            varying: VertexIntensity::default(),
            base,
        }
    }

    pub fn band(intensity: f32) -> f32 {
        match intensity {
            i if i > 0.85 => 1.0,
            i if i > 0.60 => 0.80,
            i if i > 0.45 => 0.60,
            i if i > 0.30 => 0.45,
            i if i > 0.15 => 0.30,
            _ => 0.0,
        }
    }
}

impl Shader for ToonShader {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        self.varying.store(ctx, face, nth);
        ctx.clip_position(face, nth)
    }

    fn fragment(&self, _ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>> {
        let intensity = self.varying.intensity.interpolate(bar);
        Some(self.base * Self::band(intensity))
    }
}

/// Gouraud intensity modulating the diffuse map.
#[derive(Default)]
pub struct TexturedGouraudShader {
    varying: VertexIntensity,
    uv: Varying<Vector2<f32>>,
}

impl TexturedGouraudShader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Shader for TexturedGouraudShader {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        self.varying.store(ctx, face, nth);
        self.uv.set(nth, ctx.model.vertex_uv(face, nth));
        ctx.clip_position(face, nth)
    }

    fn fragment(&self, ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>> {
        let intensity = self.varying.intensity.interpolate(bar);
        let uv = self.uv.interpolate(bar);
        Some(ctx.model.diffuse(uv) * intensity)
    }
}
