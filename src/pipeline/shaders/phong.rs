use crate::core::math::transform::{embed, project, transform_direction};
use crate::core::pipeline::{Shader, Varying};
use crate::error::Result;
use crate::pipeline::shaders::{lambert, phong_specular, reflect};
use crate::scene::context::RenderContext;
use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// Default ambient term added to every lit pixel.
pub const DEFAULT_AMBIENT: f32 = 5.0 / 255.0;

/// Weight of the specular term against the diffuse one.
const SPECULAR_WEIGHT: f32 = 0.6;

/// A standard Phong lighting shader.
/// Calculates Ambient + Diffuse + Specular per pixel in shading space (P·MV).
pub struct PhongShader {
    uniform_mit: Matrix4<f32>,
    light: Vector3<f32>,
    pub ambient: f32,

    uv: Varying<Vector2<f32>>,
    normal: Varying<Vector3<f32>>,
}

impl PhongShader {
    pub fn new(ctx: &RenderContext) -> Result<Self> {
        let uniform_mit = ctx.transforms.uniform_mit()?;
        let light = transform_direction(&ctx.transforms.uniform_m(), &ctx.light_dir);
        Ok(Self {
            uniform_mit,
            light,
            ambient: DEFAULT_AMBIENT,
            uv: Varying::new(),
            normal: Varying::new(),
        })
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient;
        self
    }
}

impl Shader for PhongShader {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        // 1. Varyings: uv as is, normal into shading space
        self.uv.set(nth, ctx.model.vertex_uv(face, nth));
        let n = ctx.model.vertex_normal(face, nth);
        self.normal
            .set(nth, project(&(self.uniform_mit * embed(&n, 0.0))));

        // 2. Screen position
        ctx.clip_position(face, nth)
    }

    fn fragment(&self, ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>> {
        let uv = self.uv.interpolate(bar);

        // 1. Normal: object-space map if present, else the interpolated one
        let n = match ctx.model.normal(uv) {
            Some(mapped) => transform_direction(&self.uniform_mit, &mapped),
            None => self.normal.interpolate(bar).normalize(),
        };

        // 2. Lighting
        let l = self.light;
        let diffuse = lambert(&n, &l);
        let specular = phong_specular(&reflect(&n, &l), ctx.model.specular(uv));

        // 3. Combine
        let color = ctx.model.diffuse(uv);
        Some(color * (diffuse + SPECULAR_WEIGHT * specular) + Vector3::repeat(self.ambient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::TransformSet;
    use crate::scene::mesh::Mesh;
    use crate::scene::model::Model;

    fn shade(light: Vector3<f32>) -> Vector3<f32> {
        let model = Model::from_mesh(Mesh::create_test_triangle());
        let ctx = RenderContext::new(&model, light, TransformSet::identity());
        let mut shader = PhongShader::new(&ctx).unwrap().with_ambient(0.0);
        for nth in 0..3 {
            shader.vertex(&ctx, 0, nth);
        }
        shader.fragment(&ctx, Vector3::new(0.2, 0.3, 0.5)).unwrap()
    }

    #[test]
    fn head_on_light_gives_diffuse_plus_specular() {
        let c = shade(Vector3::z());
        assert!((c.x - 1.6).abs() < 1e-4);
    }

    #[test]
    fn back_light_leaves_only_ambient() {
        let model = Model::from_mesh(Mesh::create_test_triangle());
        let ctx = RenderContext::new(&model, -Vector3::z(), TransformSet::identity());
        let mut shader = PhongShader::new(&ctx).unwrap();
        for nth in 0..3 {
            shader.vertex(&ctx, 0, nth);
        }
        let c = shader.fragment(&ctx, Vector3::x()).unwrap();
        assert!((c - Vector3::repeat(DEFAULT_AMBIENT)).norm() < 1e-6);
    }

    #[test]
    fn grazing_light_is_dimmer_than_head_on() {
        let grazing = shade(Vector3::new(1.0, 0.0, 0.2));
        let head_on = shade(Vector3::z());
        assert!(grazing.x < head_on.x);
        assert!(grazing.x > 0.0);
    }
}
