use crate::error::{RenderError, Result};
use nalgebra::{Matrix4, Vector3, Vector4};

const DEGENERATE_EPSILON: f32 = 1e-6;

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the three matrices of a render pass.
/// Built by hand so the coordinate conventions stay explicit (right-handed,
/// camera looking down -Z, screen depth growing away from the viewer).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates the ModelView (look-at) matrix.
    ///
    /// Basis: z = normalize(eye - center), x = normalize(up × z), y = z × x.
    /// The matrix translates by -eye, then rotates into that basis.
    pub fn look_at(
        eye: &Vector3<f32>,
        center: &Vector3<f32>,
        up: &Vector3<f32>,
    ) -> Result<Matrix4<f32>> {
        let forward = eye - center;
        if forward.norm() < DEGENERATE_EPSILON {
            return Err(RenderError::DegenerateVector("eye and center coincide"));
        }
        let z_axis = forward.normalize();
        let right = up.cross(&z_axis);
        if right.norm() < DEGENERATE_EPSILON {
            return Err(RenderError::DegenerateVector("up vector is zero or parallel to the view axis"));
        }
        let x_axis = right.normalize();
        let y_axis = z_axis.cross(&x_axis);

        let rotation = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, 0.0,
            y_axis.x, y_axis.y, y_axis.z, 0.0,
            z_axis.x, z_axis.y, z_axis.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        Ok(rotation * Self::translation(&-eye))
    }

    /// Creates the projection matrix: w' = 1 + coeff * z.
    ///
    /// `coeff` is `-1 / |eye - center|` for a perspective camera and `0` for an
    /// orthographic (light) pass.
    pub fn projection(coeff: f32) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0,   0.0,
            0.0, 1.0, 0.0,   0.0,
            0.0, 0.0, 1.0,   0.0,
            0.0, 0.0, coeff, 1.0,
        )
    }

    /// The projection coefficient of a camera placed at `eye` looking at `center`.
    pub fn perspective_coeff(eye: &Vector3<f32>, center: &Vector3<f32>) -> Result<f32> {
        let distance = (eye - center).norm();
        if distance < DEGENERATE_EPSILON {
            return Err(RenderError::DegenerateVector("eye and center coincide"));
        }
        Ok(-1.0 / distance)
    }

    /// Creates the viewport matrix mapping the [-1, 1]³ cube onto the pixel
    /// rectangle `(x, y, w, h)` and onto the depth range `[0, depth]`.
    ///
    /// NDC z = +1 (closest to the eye in the look-at basis) maps to depth 0.
    pub fn viewport(x: f32, y: f32, w: f32, h: f32, depth: f32) -> Matrix4<f32> {
        Matrix4::new(
            w / 2.0, 0.0,     0.0,           x + w / 2.0,
            0.0,     h / 2.0, 0.0,           y + h / 2.0,
            0.0,     0.0,     -depth / 2.0,  depth / 2.0,
            0.0,     0.0,     0.0,           1.0,
        )
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

//=================================
// Transform Set
//=================================

/// The three matrices of one render pass. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSet {
    pub model_view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub viewport: Matrix4<f32>,
}

impl TransformSet {
    pub fn new(model_view: Matrix4<f32>, projection: Matrix4<f32>, viewport: Matrix4<f32>) -> Self {
        Self {
            model_view,
            projection,
            viewport,
        }
    }

    /// Identity everywhere: object coordinates are already screen coordinates.
    pub fn identity() -> Self {
        Self::new(Matrix4::identity(), Matrix4::identity(), Matrix4::identity())
    }

    /// Viewport · Projection · ModelView.
    pub fn combined(&self) -> Matrix4<f32> {
        self.viewport * self.projection * self.model_view
    }

    /// Projection · ModelView, used to move directions into the shading space.
    pub fn uniform_m(&self) -> Matrix4<f32> {
        self.projection * self.model_view
    }

    /// (Projection · ModelView)⁻ᵀ, used to move normals into the shading space.
    pub fn uniform_mit(&self) -> Result<Matrix4<f32>> {
        self.uniform_m()
            .try_inverse()
            .map(|m| m.transpose())
            .ok_or(RenderError::SingularTransform("projection * model-view"))
    }

    /// (Viewport · Projection · ModelView)⁻¹: screen space back to object space.
    pub fn inverse_combined(&self) -> Result<Matrix4<f32>> {
        self.combined()
            .try_inverse()
            .ok_or(RenderError::SingularTransform("viewport * projection * model-view"))
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Lifts a 3D vector into homogeneous space with the given fourth coordinate
/// (1 for points, 0 for directions).
#[inline]
pub fn embed(v: &Vector3<f32>, w: f32) -> Vector4<f32> {
    Vector4::new(v.x, v.y, v.z, w)
}

/// Drops the fourth coordinate.
#[inline]
pub fn project(v: &Vector4<f32>) -> Vector3<f32> {
    v.xyz()
}

/// Divides by w. Returns `None` when w is numerically zero.
#[inline]
pub fn perspective_divide(v: &Vector4<f32>) -> Option<Vector3<f32>> {
    if v.w.abs() > 1e-8 {
        Some(v.xyz() / v.w)
    } else {
        None
    }
}

/// Applies a transform to a direction (w = 0) and normalizes the result.
#[inline]
pub fn transform_direction(m: &Matrix4<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    project(&(m * embed(v, 0.0))).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).norm() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn look_at_moves_eye_to_origin_and_center_down_negative_z() {
        let eye = Vector3::new(1.0, 1.0, 3.0);
        let center = Vector3::zeros();
        let mv = TransformFactory::look_at(&eye, &center, &Vector3::y()).unwrap();

        let eye_view = project(&(mv * embed(&eye, 1.0)));
        assert_close(eye_view, Vector3::zeros());

        let center_view = project(&(mv * embed(&center, 1.0)));
        let distance = (eye - center).norm();
        assert_close(center_view, Vector3::new(0.0, 0.0, -distance));
    }

    #[test]
    fn look_at_basis_is_orthonormal() {
        let mv = TransformFactory::look_at(
            &Vector3::new(2.0, -1.0, 0.5),
            &Vector3::new(0.0, 0.3, 0.0),
            &Vector3::y(),
        )
        .unwrap();
        let r = mv.fixed_view::<3, 3>(0, 0).into_owned();
        let should_be_identity = r * r.transpose();
        assert!((should_be_identity - nalgebra::Matrix3::identity()).norm() < 1e-5);
    }

    #[test]
    fn look_at_rejects_degenerate_inputs() {
        let up = Vector3::y();
        assert!(matches!(
            TransformFactory::look_at(&Vector3::x(), &Vector3::x(), &up),
            Err(RenderError::DegenerateVector(_))
        ));
        assert!(matches!(
            TransformFactory::look_at(&Vector3::new(0.0, 3.0, 0.0), &Vector3::zeros(), &up),
            Err(RenderError::DegenerateVector(_))
        ));
        assert!(TransformFactory::perspective_coeff(&Vector3::zeros(), &Vector3::zeros()).is_err());
    }

    #[test]
    fn projection_puts_coefficient_into_w() {
        let p = TransformFactory::projection(-0.25);
        let v = p * Vector4::new(1.0, 2.0, -4.0, 1.0);
        assert_eq!(v, Vector4::new(1.0, 2.0, -4.0, 2.0));
        assert_eq!(TransformFactory::projection(0.0), Matrix4::identity());
    }

    #[test]
    fn viewport_maps_ndc_cube_to_rectangle_and_depth_range() {
        let vp = TransformFactory::viewport(10.0, 20.0, 100.0, 50.0, 255.0);
        let lo = project(&(vp * Vector4::new(-1.0, -1.0, 1.0, 1.0)));
        let hi = project(&(vp * Vector4::new(1.0, 1.0, -1.0, 1.0)));
        assert_close(lo, Vector3::new(10.0, 20.0, 0.0));
        assert_close(hi, Vector3::new(110.0, 70.0, 255.0));
    }

    #[test]
    fn closer_points_get_smaller_screen_depth() {
        let eye = Vector3::new(0.0, 0.0, 3.0);
        let center = Vector3::zeros();
        let set = TransformSet::new(
            TransformFactory::look_at(&eye, &center, &Vector3::y()).unwrap(),
            TransformFactory::projection(TransformFactory::perspective_coeff(&eye, &center).unwrap()),
            TransformFactory::viewport(0.0, 0.0, 100.0, 100.0, 255.0),
        );
        let near = perspective_divide(&(set.combined() * Vector4::new(0.0, 0.0, 1.0, 1.0))).unwrap();
        let far = perspective_divide(&(set.combined() * Vector4::new(0.0, 0.0, -1.0, 1.0))).unwrap();
        assert!(near.z < far.z);
    }

    #[test]
    fn inverse_combined_round_trips() {
        let set = TransformSet::new(
            TransformFactory::look_at(&Vector3::new(1.0, 1.0, 3.0), &Vector3::zeros(), &Vector3::y())
                .unwrap(),
            TransformFactory::projection(-0.3),
            TransformFactory::viewport(0.0, 0.0, 80.0, 80.0, 255.0),
        );
        let p = Vector4::new(0.3, -0.2, 0.4, 1.0);
        let back = set.inverse_combined().unwrap() * (set.combined() * p);
        assert_close(perspective_divide(&back).unwrap(), p.xyz());
    }

    #[test]
    fn singular_transforms_are_reported() {
        let mut set = TransformSet::identity();
        set.viewport = Matrix4::zeros();
        assert!(matches!(
            set.inverse_combined(),
            Err(RenderError::SingularTransform(_))
        ));
        set.model_view = Matrix4::zeros();
        assert!(set.uniform_mit().is_err());
    }
}
