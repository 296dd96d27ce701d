use crate::core::math::transform::{TransformSet, embed};
use crate::scene::model::Model;
use nalgebra::{Vector3, Vector4};

/// Everything a shader may read during one pass over one model.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub model: &'a Model,
    /// Toward the light, not necessarily normalized.
    pub light_dir: Vector3<f32>,
    pub transforms: TransformSet,
}

impl<'a> RenderContext<'a> {
    pub fn new(model: &'a Model, light_dir: Vector3<f32>, transforms: TransformSet) -> Self {
        Self {
            model,
            light_dir,
            transforms,
        }
    }

    /// Viewport · Projection · ModelView applied to a vertex of the model.
    #[inline]
    pub fn clip_position(&self, face: usize, nth: usize) -> Vector4<f32> {
        self.transforms.combined() * embed(&self.model.vertex_position(face, nth), 1.0)
    }
}
