use crate::io::image::{Format, Image};

/// Per-pixel depth, smaller is nearer. Reset to `+∞` before each full render.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![f32::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn reset(&mut self) {
        self.data.fill(f32::INFINITY);
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Stored depth, `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// True when `depth` is strictly nearer than the stored value.
    /// Equal depths lose, so the first writer keeps the pixel.
    #[inline]
    pub fn test(&self, x: usize, y: usize, depth: f32) -> bool {
        self.get(x, y).is_some_and(|stored| depth < stored)
    }

    /// Unconditional write, used after a successful test once the fragment survived.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, depth: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = depth;
        }
    }

    /// Number of pixels that received at least one fragment.
    pub fn covered(&self) -> usize {
        self.data.iter().filter(|d| d.is_finite()).count()
    }

    /// Grayscale visualization: the nearest written pixel is white, the farthest
    /// dark gray, untouched pixels black.
    pub fn to_image(&self) -> Image {
        let mut image = Image::new(self.width, self.height, Format::Grayscale);
        let (min, max) = self
            .data
            .iter()
            .filter(|d| d.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| {
                (lo.min(d), hi.max(d))
            });
        if min > max {
            return image;
        }
        let span = (max - min).max(f32::EPSILON);

        for y in 0..self.height {
            for x in 0..self.width {
                let d = self.data[y * self.width + x];
                if !d.is_finite() {
                    continue;
                }
                let t = 1.0 - (d - min) / span;
                let gray = (32.0 + t * 223.0).round() as u8;
                image.set(x, y, [gray, gray, gray, 255]);
            }
        }
        image
    }
}

/// Color target plus z-buffer of one render pass.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub image: Image,
    pub depth: DepthBuffer,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: Image::new(width, height, Format::Rgb),
            depth: DepthBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    /// Black color, `+∞` depth.
    pub fn clear(&mut self) {
        self.image.clear();
        self.depth.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_buffer_accepts_any_finite_depth() {
        let mut depth = DepthBuffer::new(2, 2);
        assert!(depth.test(1, 1, 1e30));
        depth.set(1, 1, 1e30);
        assert_eq!(depth.get(1, 1), Some(1e30));
        assert_eq!(depth.get(0, 0), Some(f32::INFINITY));
    }

    #[test]
    fn only_strictly_nearer_fragments_win() {
        let mut depth = DepthBuffer::new(1, 1);
        depth.set(0, 0, 5.0);
        assert!(!depth.test(0, 0, 5.0));
        assert!(!depth.test(0, 0, 7.0));
        assert!(depth.test(0, 0, 2.0));
        depth.set(0, 0, 2.0);
        assert_eq!(depth.get(0, 0), Some(2.0));
    }

    #[test]
    fn out_of_bounds_never_passes() {
        let mut depth = DepthBuffer::new(2, 2);
        assert!(!depth.test(2, 0, 0.0));
        depth.set(2, 0, 0.0);
        assert!(depth.get(0, 2).is_none());
        assert_eq!(depth.covered(), 0);
    }

    #[test]
    fn reset_restores_infinity() {
        let mut fb = FrameBuffer::new(3, 3);
        fb.depth.set(1, 2, 4.0);
        fb.image.set(1, 2, [9, 9, 9, 255]);
        fb.clear();
        assert_eq!(fb.depth.covered(), 0);
        assert_eq!(fb.image.get(1, 2), Some([0, 0, 0, 255]));
    }

    #[test]
    fn depth_image_maps_near_to_bright() {
        let mut depth = DepthBuffer::new(3, 1);
        depth.set(0, 0, 1.0);
        depth.set(1, 0, 3.0);
        let image = depth.to_image();
        let near = image.get(0, 0).unwrap()[0];
        let far = image.get(1, 0).unwrap()[0];
        assert_eq!(near, 255);
        assert!(far < near && far > 0);
        assert_eq!(image.get(2, 0).unwrap()[0], 0);
    }
}
