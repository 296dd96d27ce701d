use crate::core::pipeline::Shader;
use crate::scene::context::RenderContext;
use nalgebra::{Vector3, Vector4};

/// Colors each face with a palette entry, cycling through the palette by face index.
pub struct FlatShader {
    palette: Vec<Vector3<f32>>,
    face: usize,
}

impl FlatShader {
    pub fn new(palette: Vec<Vector3<f32>>) -> Self {
        Self { palette, face: 0 }
    }

    /// Six saturated colors, so neighbouring faces stay distinguishable.
    pub fn rainbow() -> Self {
        Self::new(vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.6, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.5, 1.0),
            Vector3::new(0.6, 0.0, 1.0),
        ])
    }
}

impl Shader for FlatShader {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vector4<f32> {
        self.face = face;
        ctx.clip_position(face, nth)
    }

    fn fragment(&self, _ctx: &RenderContext, _bar: Vector3<f32>) -> Option<Vector3<f32>> {
        if self.palette.is_empty() {
            return Some(Vector3::repeat(1.0));
        }
        Some(self.palette[self.face % self.palette.len()])
    }
}
