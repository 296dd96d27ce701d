use crate::core::math::transform::{TransformFactory, TransformSet};
use crate::error::Result;
use nalgebra::Vector3;

/// Screen rectangle plus depth range that the [-1, 1]³ cube is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Viewport {
    /// Centered rectangle covering three quarters of the image.
    pub fn centered(image_width: usize, image_height: usize, depth: f32) -> Self {
        let (w, h) = (image_width as f32, image_height as f32);
        Self {
            x: w / 8.0,
            y: h / 8.0,
            width: w * 3.0 / 4.0,
            height: h * 3.0 / 4.0,
            depth,
        }
    }
}

/// Look-at camera with a single projection coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vector3<f32>,
    pub center: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Perspective camera (coeff = -1 / distance) or orthographic (coeff = 0).
    pub perspective: bool,
}

impl Camera {
    pub fn new(eye: Vector3<f32>, center: Vector3<f32>, up: Vector3<f32>) -> Self {
        Self {
            eye,
            center,
            up,
            perspective: true,
        }
    }

    /// Orthographic camera looking from `eye` toward `center`.
    pub fn orthographic(eye: Vector3<f32>, center: Vector3<f32>, up: Vector3<f32>) -> Self {
        Self {
            perspective: false,
            ..Self::new(eye, center, up)
        }
    }

    pub fn projection_coeff(&self) -> Result<f32> {
        if self.perspective {
            TransformFactory::perspective_coeff(&self.eye, &self.center)
        } else {
            Ok(0.0)
        }
    }

    /// Builds the ModelView, Projection and Viewport matrices for this camera.
    pub fn transforms(&self, viewport: &Viewport) -> Result<TransformSet> {
        let model_view = TransformFactory::look_at(&self.eye, &self.center, &self.up)?;
        let projection = TransformFactory::projection(self.projection_coeff()?);
        let viewport = TransformFactory::viewport(
            viewport.x,
            viewport.y,
            viewport.width,
            viewport.height,
            viewport.depth,
        );
        Ok(TransformSet::new(model_view, projection, viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::{embed, perspective_divide};

    #[test]
    fn center_lands_in_the_middle_of_the_viewport() {
        let cam = Camera::new(Vector3::new(1.0, 1.0, 3.0), Vector3::zeros(), Vector3::y());
        let vp = Viewport::centered(800, 800, 2000.0);
        let set = cam.transforms(&vp).unwrap();
        let p = perspective_divide(&(set.combined() * embed(&cam.center, 1.0))).unwrap();
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn orthographic_camera_keeps_w_at_one() {
        let cam = Camera::orthographic(Vector3::new(1.0, 1.0, 1.0), Vector3::zeros(), Vector3::y());
        let set = cam.transforms(&Viewport::centered(100, 100, 255.0)).unwrap();
        let clip = set.combined() * embed(&Vector3::new(0.3, -0.4, 0.2), 1.0);
        assert!((clip.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn coincident_eye_and_center_fail() {
        let cam = Camera::new(Vector3::zeros(), Vector3::zeros(), Vector3::y());
        assert!(cam.transforms(&Viewport::centered(10, 10, 1.0)).is_err());
    }
}
