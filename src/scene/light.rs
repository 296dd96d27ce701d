use crate::error::{RenderError, Result};
use nalgebra::Vector3;

/// The single directional light of a scene.
///
/// `direction` points from the scene toward the light and doubles as the
/// light's eye position for the shadow pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    direction: Vector3<f32>,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>) -> Result<Self> {
        if direction.norm() < 1e-6 {
            return Err(RenderError::DegenerateVector("light direction is zero"));
        }
        Ok(Self { direction })
    }

    /// As configured, used as the eye of the light pass.
    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }
}
