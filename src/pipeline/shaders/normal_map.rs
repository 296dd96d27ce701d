use crate::core::math::transform::{embed, perspective_divide, project, transform_direction};
use crate::core::pipeline::{Shader, Varying};
use crate::error::Result;
use crate::pipeline::shaders::lambert;
use crate::scene::context::RenderContext;
use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// Diffuse lighting with normals read from an object-space normal map.
///
/// Normals are moved into shading space by (P·MV)⁻ᵀ, the light by P·MV.
/// Without a map the interpolated vertex normal is used.
pub struct NormalMapShader {
    uniform_mit: Matrix4<f32>,
    light: Vector3<f32>,
    uv: Varying<Vector2<f32>>,
    normal: Varying<Vector3<f32>>,
}

impl NormalMapShader {
    pub fn new(ctx: &RenderContext) -> Result<Self> {
        let uniform_mit = ctx.transforms.uniform_mit()?;
        let light = transform_direction(&ctx.transforms.uniform_m(), &ctx.light_dir);
        Ok(Self {
            uniform_mit,
            light,
            uv: Varying::new(),
            normal: Varying::new(),
        })
    }
}

impl Shader for NormalMapShader {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        self.uv.set(nth, ctx.model.vertex_uv(face, nth));
        self.normal.set(nth, ctx.model.vertex_normal(face, nth));
        ctx.clip_position(face, nth)
    }

    fn fragment(&self, ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>> {
        let uv = self.uv.interpolate(bar);
        let object_normal = ctx
            .model
            .normal(uv)
            .unwrap_or_else(|| self.normal.interpolate(bar));
        let n = transform_direction(&self.uniform_mit, &object_normal);
        Some(ctx.model.diffuse(uv) * lambert(&n, &self.light))
    }
}

/// Diffuse lighting with a tangent-space normal map.
///
/// Per fragment, the Darboux frame (tangent, bitangent, interpolated normal)
/// is solved from the triangle's NDC edges and uv deltas.
pub struct TangentSpaceShader {
    uniform_m: Matrix4<f32>,
    uniform_mit: Matrix4<f32>,
    light: Vector3<f32>,
    uv: Varying<Vector2<f32>>,
    normal: Varying<Vector3<f32>>,
    ndc: Varying<Vector3<f32>>,
}

impl TangentSpaceShader {
    pub fn new(ctx: &RenderContext) -> Result<Self> {
        let uniform_m = ctx.transforms.uniform_m();
        let uniform_mit = ctx.transforms.uniform_mit()?;
        let light = transform_direction(&uniform_m, &ctx.light_dir);
        Ok(Self {
            uniform_m,
            uniform_mit,
            light,
            uv: Varying::new(),
            normal: Varying::new(),
            ndc: Varying::new(),
        })
    }

    /// Columns: tangent, bitangent, normal. `None` when the triangle is
    /// degenerate in NDC or uv space.
    fn darboux_frame(&self, bn: &Vector3<f32>) -> Option<Matrix3<f32>> {
        let (p0, p1, p2) = (self.ndc.get(0), self.ndc.get(1), self.ndc.get(2));
        let a = Matrix3::from_rows(&[
            (p1 - p0).transpose(),
            (p2 - p0).transpose(),
            bn.transpose(),
        ]);
        let ai = a.try_inverse()?;

        let (t0, t1, t2) = (self.uv.get(0), self.uv.get(1), self.uv.get(2));
        let i = ai * Vector3::new(t1.x - t0.x, t2.x - t0.x, 0.0);
        let j = ai * Vector3::new(t1.y - t0.y, t2.y - t0.y, 0.0);

        let i = i.try_normalize(f32::EPSILON)?;
        let j = j.try_normalize(f32::EPSILON)?;
        Some(Matrix3::from_columns(&[i, j, *bn]))
    }
}

impl Shader for TangentSpaceShader {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        let position = embed(&ctx.model.vertex_position(face, nth), 1.0);
        self.uv.set(nth, ctx.model.vertex_uv(face, nth));
        self.normal.set(
            nth,
            project(&(self.uniform_mit * embed(&ctx.model.vertex_normal(face, nth), 0.0))),
        );
        let ndc = perspective_divide(&(self.uniform_m * position)).unwrap_or_else(Vector3::zeros);
        self.ndc.set(nth, ndc);
        ctx.clip_position(face, nth)
    }

    fn fragment(&self, ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>> {
        let uv = self.uv.interpolate(bar);
        let bn = self
            .normal
            .interpolate(bar)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);

        let n = match (ctx.model.tangent_normal(uv), self.darboux_frame(&bn)) {
            (Some(tangent_normal), Some(frame)) => (frame * tangent_normal)
                .try_normalize(f32::EPSILON)
                .unwrap_or(bn),
            _ => bn,
        };
        Some(ctx.model.diffuse(uv) * lambert(&n, &self.light))
    }
}
