use crate::core::framebuffer::FrameBuffer;
use crate::core::math::transform::perspective_divide;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::{Rasterizer, TriangleStats};
use crate::io::image::{Image, Pixel};
use crate::scene::context::RenderContext;
use log::debug;

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    /// Black image, depth reset to +∞.
    pub fn clear(&mut self) {
        self.framebuffer.clear();
    }

    /// Draws every face of the context's model.
    ///
    /// The vertex stage runs for slots 0, 1, 2 of a face, then the face is rasterized.
    pub fn draw_model<S: Shader + ?Sized>(
        &mut self,
        ctx: &RenderContext,
        shader: &mut S,
    ) -> TriangleStats {
        let mut stats = TriangleStats::default();
        for face in 0..ctx.model.face_count() {
            let clip_coords = [0, 1, 2].map(|nth| shader.vertex(ctx, face, nth));
            stats.accumulate(self.rasterizer.rasterize_triangle(
                &mut self.framebuffer,
                ctx,
                shader,
                &clip_coords,
            ));
        }
        debug!(
            "Model '{}': {} faces, {} pixels written, {} occluded, {} discarded",
            ctx.model.name,
            ctx.model.face_count(),
            stats.written,
            stats.occluded,
            stats.discarded
        );
        stats
    }

    /// Outlines every face of the context's model with Bresenham lines.
    /// Drawn over the color image; the depth buffer is not touched.
    pub fn draw_wireframe(&mut self, ctx: &RenderContext, pixel: Pixel) {
        for face in 0..ctx.model.face_count() {
            let Some(corners) = [0, 1, 2]
                .map(|nth| perspective_divide(&ctx.clip_position(face, nth)))
                .into_iter()
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };
            for i in 0..3 {
                let (a, b) = (corners[i], corners[(i + 1) % 3]);
                self.framebuffer
                    .image
                    .line(a.x.floor(), a.y.floor(), b.x.floor(), b.y.floor(), pixel);
            }
        }
    }

    /// Grayscale view of the z-buffer: nearer is brighter, empty pixels black.
    pub fn depth_image(&self) -> Image {
        self.framebuffer.depth.to_image()
    }
}
