use crate::error::Result;
use crate::io::image::{Image, Pixel};
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// Represents a 2D texture map, sampled with nearest-texel lookup.
///
/// Rows are stored bottom-up so that v = 0 is the first row.
#[derive(Debug, Clone)]
pub struct Texture {
    image: Image,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let mut image = Image::read(path_ref)?;
        image.flip_vertically();
        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref,
            image.width(),
            image.height()
        );
        Ok(Self { image })
    }

    /// Wraps an image whose row 0 already is v = 0.
    pub fn from_image(image: Image) -> Self {
        Self { image }
    }

    /// Raw texel under `uv`; coordinates outside [0, 1] are clamped to the border.
    pub fn texel(&self, uv: Vector2<f32>) -> Pixel {
        let (w, h) = (self.image.width(), self.image.height());
        if w == 0 || h == 0 {
            return [0, 0, 0, 255];
        }
        let x = ((uv.x * w as f32).max(0.0) as usize).min(w - 1);
        let y = ((uv.y * h as f32).max(0.0) as usize).min(h - 1);
        self.image.get(x, y).unwrap_or([0, 0, 0, 255])
    }

    /// Texel color in [0, 1].
    pub fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let p = self.texel(uv);
        Vector3::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::image::Format;

    fn checker() -> Texture {
        let mut img = Image::new(2, 2, Format::Rgb);
        img.set(0, 0, [255, 0, 0, 255]);
        img.set(1, 0, [0, 255, 0, 255]);
        img.set(0, 1, [0, 0, 255, 255]);
        img.set(1, 1, [255, 255, 255, 255]);
        Texture::from_image(img)
    }

    #[test]
    fn nearest_texel_is_picked() {
        let tex = checker();
        assert_eq!(tex.sample(Vector2::new(0.1, 0.1)), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(Vector2::new(0.9, 0.2)), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(tex.sample(Vector2::new(0.2, 0.7)), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn out_of_range_uv_is_clamped() {
        let tex = checker();
        assert_eq!(tex.texel(Vector2::new(1.0, 1.0)), [255, 255, 255, 255]);
        assert_eq!(tex.texel(Vector2::new(-3.0, -0.5)), [255, 0, 0, 255]);
    }
}
