use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{DEGENERATE_AREA, coverage, signed_area_x2};
use crate::core::math::transform::perspective_divide;
use crate::core::pipeline::Shader;
use crate::scene::context::RenderContext;
use nalgebra::{Point2, Vector3, Vector4};
use serde::Deserialize;

/// Which triangles are skipped based on their screen-space winding.
/// Counter-clockwise (positive signed area) is front facing.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    Back,
    Front,
    #[default]
    None,
}

/// What happened to a single triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangleStats {
    /// Pixels whose fragment was written.
    pub written: usize,
    /// Covered pixels rejected by the depth test.
    pub occluded: usize,
    /// Pixels discarded by the fragment stage.
    pub discarded: usize,
}

impl TriangleStats {
    pub fn accumulate(&mut self, other: TriangleStats) {
        self.written += other.written;
        self.occluded += other.occluded;
        self.discarded += other.discarded;
    }
}

/// The Rasterizer is responsible for drawing triangles onto the FrameBuffer.
///
/// Bounding box traversal with pixel-center sampling and barycentric weights.
/// Depth is the linear blend of post-divide screen z.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rasterizer {
    pub cull_mode: CullMode,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Rasterize one triangle given its three viewport-space homogeneous positions.
    ///
    /// Zero-area triangles and vertices with w ≈ 0 contribute nothing.
    pub fn rasterize_triangle<S: Shader + ?Sized>(
        &self,
        framebuffer: &mut FrameBuffer,
        ctx: &RenderContext,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
    ) -> TriangleStats {
        let mut stats = TriangleStats::default();

        // 1. Perspective division
        let mut screen = [Vector3::zeros(); 3];
        for (i, clip) in clip_coords.iter().enumerate() {
            match perspective_divide(clip) {
                Some(p) => screen[i] = p,
                None => return stats,
            }
        }
        let pts = screen.map(|p| Point2::new(p.x, p.y));

        // 2. Degenerate rejection and culling
        let area = signed_area_x2(pts[0], pts[1], pts[2]);
        if !area.is_finite() || area.abs() < DEGENERATE_AREA {
            return stats;
        }
        match self.cull_mode {
            CullMode::Back if area < 0.0 => return stats,
            CullMode::Front if area > 0.0 => return stats,
            _ => {}
        }

        // 3. Bounding box, clamped to the image
        let Some((start_x, end_x, start_y, end_y)) =
            Self::clamped_bounding_box(&pts, framebuffer.width(), framebuffer.height())
        else {
            return stats;
        };

        // 4. Pixel loop
        for y in start_y..=end_y {
            for x in start_x..=end_x {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(bar) = coverage(center, pts[0], pts[1], pts[2]) else {
                    continue;
                };

                let depth = bar.x * screen[0].z + bar.y * screen[1].z + bar.z * screen[2].z;
                if !framebuffer.depth.test(x, y, depth) {
                    stats.occluded += 1;
                    continue;
                }

                match shader.fragment(ctx, bar) {
                    Some(color) => {
                        framebuffer.depth.set(x, y, depth);
                        framebuffer.image.set_color(x, y, color);
                        stats.written += 1;
                    }
                    None => stats.discarded += 1,
                }
            }
        }
        stats
    }

    /// Inclusive pixel range whose centers may fall inside the triangle,
    /// or `None` when it misses the image entirely.
    fn clamped_bounding_box(
        points: &[Point2<f32>; 3],
        width: usize,
        height: usize,
    ) -> Option<(usize, usize, usize, usize)> {
        if width == 0 || height == 0 {
            return None;
        }
        let min_x = points[0].x.min(points[1].x).min(points[2].x).floor();
        let min_y = points[0].y.min(points[1].y).min(points[2].y).floor();
        let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil();
        let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil();

        if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
            return None;
        }

        let start_x = min_x.max(0.0) as usize;
        let start_y = min_y.max(0.0) as usize;
        let end_x = (max_x as usize).min(width - 1);
        let end_y = (max_y as usize).min(height - 1);
        Some((start_x, end_x, start_y, end_y))
    }
}
