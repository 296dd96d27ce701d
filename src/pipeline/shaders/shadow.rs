use crate::core::framebuffer::DepthBuffer;
use crate::core::math::transform::{embed, perspective_divide, transform_direction};
use crate::core::pipeline::{Shader, Varying};
use crate::error::Result;
use crate::pipeline::shaders::{lambert, phong_specular, reflect};
use crate::scene::context::RenderContext;
use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

const DIFFUSE_WEIGHT: f32 = 1.2;
const SPECULAR_WEIGHT: f32 = 0.6;

/// Depth-only pass: gray proportional to screen depth.
/// The rasterizer fills the z-buffer, which is what the shadow pass keeps.
pub struct DepthShader {
    depth_range: f32,
    screen: Varying<Vector3<f32>>,
}

impl DepthShader {
    pub fn new(depth_range: f32) -> Self {
        Self {
            depth_range,
            screen: Varying::new(),
        }
    }
}

impl Shader for DepthShader {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        let clip = ctx.clip_position(face, nth);
        self.screen
            .set(nth, perspective_divide(&clip).unwrap_or_else(Vector3::zeros));
        clip
    }

    fn fragment(&self, _ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>> {
        let p = self.screen.interpolate(bar);
        Some(Vector3::repeat(p.z / self.depth_range))
    }
}

/// Phong lighting attenuated by a shadow map.
///
/// Each fragment's screen position is carried into the light's screen space by
/// the shadow matrix and compared with the depth the light pass stored there.
pub struct ShadowPhongShader<'a> {
    uniform_mit: Matrix4<f32>,
    light: Vector3<f32>,
    shadow_matrix: Matrix4<f32>,
    shadow_map: &'a DepthBuffer,
    pub shadow_bias: f32,
    pub ambient: f32,

    uv: Varying<Vector2<f32>>,
    normal: Varying<Vector3<f32>>,
    screen: Varying<Vector3<f32>>,
}

impl<'a> ShadowPhongShader<'a> {
    pub fn new(
        ctx: &RenderContext,
        shadow_matrix: Matrix4<f32>,
        shadow_map: &'a DepthBuffer,
        shadow_bias: f32,
        ambient: f32,
    ) -> Result<Self> {
        let uniform_mit = ctx.transforms.uniform_mit()?;
        let light = transform_direction(&ctx.transforms.uniform_m(), &ctx.light_dir);
        Ok(Self {
            uniform_mit,
            light,
            shadow_matrix,
            shadow_map,
            shadow_bias,
            ambient,
            uv: Varying::new(),
            normal: Varying::new(),
            screen: Varying::new(),
        })
    }

    /// 1 when the light reaches the camera-screen point `screen`, 0 when something
    /// nearer to the light covers it. Points outside the shadow map are lit.
    pub fn visibility(&self, screen: &Vector3<f32>) -> f32 {
        let Some(p) = perspective_divide(&(self.shadow_matrix * embed(screen, 1.0))) else {
            return 1.0;
        };
        if p.x < 0.0 || p.y < 0.0 {
            return 1.0;
        }
        match self.shadow_map.get(p.x.floor() as usize, p.y.floor() as usize) {
            Some(stored) if p.z > stored + self.shadow_bias => 0.0,
            _ => 1.0,
        }
    }
}

impl Shader for ShadowPhongShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        let clip = ctx.clip_position(face, nth);
        self.uv.set(nth, ctx.model.vertex_uv(face, nth));
        self.normal
            .set(nth, ctx.model.vertex_normal(face, nth));
        self.screen
            .set(nth, perspective_divide(&clip).unwrap_or_else(Vector3::zeros));
        clip
    }

    fn fragment(&self, ctx: &RenderContext, bar: Vector3<f32>) -> Option<Vector3<f32>> {
        let uv = self.uv.interpolate(bar);
        let visibility = self.visibility(&self.screen.interpolate(bar));

        // Object-space normal from the map, or the interpolated vertex normal.
        let object_normal = ctx
            .model
            .normal(uv)
            .unwrap_or_else(|| self.normal.interpolate(bar));
        let n = transform_direction(&self.uniform_mit, &object_normal);
        let l = self.light;

        let diffuse = lambert(&n, &l);
        let specular = phong_specular(&reflect(&n, &l), ctx.model.specular(uv));
        let lit = DIFFUSE_WEIGHT * diffuse + SPECULAR_WEIGHT * specular;

        Some(Vector3::repeat(self.ambient) + ctx.model.diffuse(uv) * (visibility * lit))
    }
}
